//! Property tests over arbitrary override records.

use std::path::PathBuf;

use proptest::prelude::*;
use wpb_config::{
    extracts_styles, plugins, resolve_settings, BuildPlan, DistributedOverride, Environment, Mode,
    OutputPaths, Plugin, SettingsOverride,
};

fn mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Development), Just(Mode::Production)]
}

fn url() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(prop_oneof![
        Just(String::new()),
        Just("/".to_string()),
        "/[a-z]{1,8}/",
    ])
}

fn environment() -> impl Strategy<Value = Environment> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(production, serve, distributed)| {
        Environment {
            production,
            serve,
            distributed,
        }
    })
}

prop_compose! {
    fn distributed()(
        is_distributed in proptest::option::of(any::<bool>()),
        app_public in proptest::option::of("[a-z]{1,8}"),
        public_url_or_path in url(),
    ) -> DistributedOverride {
        DistributedOverride { is_distributed, app_public, public_url_or_path }
    }
}

// Flags are left unset so the derived values can be checked.
prop_compose! {
    fn overrides()(
        mode in proptest::option::of(mode()),
        is_server_running in proptest::option::of(any::<bool>()),
        distributed in proptest::option::of(distributed()),
        public_url_or_path in url(),
        port in proptest::option::of(any::<u16>()),
        js in proptest::option::of("[a-z]{1,8}"),
    ) -> SettingsOverride {
        SettingsOverride {
            app_root: Some(PathBuf::from("/app")),
            mode,
            is_server_running,
            distributed,
            public_url_or_path,
            port,
            output_paths: js.map(|js| OutputPaths { js, ..OutputPaths::default() }),
            ..Default::default()
        }
    }
}

proptest! {
    #[test]
    fn explicit_mode_fixes_flags(o in overrides(), env in environment(), mode in mode()) {
        let o = SettingsOverride { mode: Some(mode), ..o };
        let s = resolve_settings(Some(&o), &env).unwrap();

        prop_assert_eq!(s.mode, mode);
        prop_assert_eq!(s.prod, mode == Mode::Production);
        prop_assert_eq!(s.dev, mode == Mode::Development);
    }

    #[test]
    fn derived_flags_are_complementary(o in overrides(), env in environment()) {
        let s = resolve_settings(Some(&o), &env).unwrap();

        prop_assert_ne!(s.prod, s.dev);
        prop_assert_eq!(s.mode == Mode::Production, s.prod);
    }

    #[test]
    fn fixed_fields_never_change(o in overrides(), env in environment()) {
        let s = resolve_settings(Some(&o), &env).unwrap();

        prop_assert_eq!(s.output_paths, OutputPaths::default());
        prop_assert_eq!(s.port, 4004);
        let keys: Vec<_> = s.alias.keys().cloned().collect();
        prop_assert_eq!(keys, vec!["@", "@UI", "@images", "@styles"]);
        prop_assert!(s.app_src.starts_with(&s.app_root));
        prop_assert!(s.app_public.starts_with(&s.app_root));
    }

    #[test]
    fn public_url_is_root_unless_distributed_url_applies(o in overrides(), env in environment()) {
        let s = resolve_settings(Some(&o), &env).unwrap();

        let distributed = o.distributed.as_ref();
        let is_distributed = distributed
            .and_then(|d| d.is_distributed)
            .unwrap_or(env.distributed);
        let distributed_url = distributed
            .and_then(|d| d.public_url_or_path.clone())
            .filter(|url| !url.is_empty());
        let requested = o.public_url_or_path.as_deref().is_some_and(|url| !url.is_empty());

        match distributed_url {
            Some(url) if requested && is_distributed => {
                prop_assert_eq!(s.public_url_or_path, url);
            }
            _ => {
                prop_assert_eq!(s.public_url_or_path, "/");
            }
        }
    }

    #[test]
    fn plugin_selection_matches_flags(o in overrides(), env in environment()) {
        let s = resolve_settings(Some(&o), &env).unwrap();
        let selected = plugins(&s);

        prop_assert_eq!(
            selected.iter().any(|p| matches!(p, Plugin::ReactRefresh { .. })),
            s.is_server_running
        );
        prop_assert_eq!(
            selected.iter().any(|p| matches!(p, Plugin::MiniCssExtract { .. })),
            extracts_styles(&s)
        );
    }

    #[test]
    fn plan_sections_follow_mode(o in overrides(), env in environment()) {
        let s = resolve_settings(Some(&o), &env).unwrap();
        let plan = BuildPlan::assemble(&s);

        prop_assert_eq!(plan.dev_server.is_some(), s.dev);
        prop_assert_eq!(plan.optimization.is_some(), s.prod);
    }

    #[test]
    fn resolution_is_repeatable(a in overrides(), b in overrides(), env in environment()) {
        let first = resolve_settings(Some(&a), &env).unwrap();
        let _ = resolve_settings(Some(&b), &env).unwrap();
        let again = resolve_settings(Some(&a), &env).unwrap();

        prop_assert_eq!(first, again);
    }
}
