//! End-to-end plan assembly.

use std::path::PathBuf;

use serde_json::json;
use wpb_config::plan::{Devtool, Stats};
use wpb_config::{
    resolve_settings, BuildPlan, Environment, Mode, ResolvedSettings, SettingsOverride,
    WebpackBuilder,
};

fn settings(o: SettingsOverride) -> ResolvedSettings {
    let o = SettingsOverride {
        app_root: Some(PathBuf::from("/app")),
        ..o
    };
    resolve_settings(Some(&o), &Environment::default()).unwrap()
}

#[test]
fn production_plan() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride {
        mode: Some(Mode::Production),
        ..Default::default()
    }));

    assert_eq!(plan.mode, Mode::Production);
    assert!(plan.dev_server.is_none());
    assert_eq!(plan.stats, Stats::Detailed);
    assert_eq!(plan.devtool, Devtool::Disabled);

    let optimization = plan.optimization.as_ref().unwrap();
    assert!(optimization.minimize);
    assert_eq!(optimization.node_env, Mode::Production);
    let minimizers: Vec<_> = optimization.minimizer.iter().map(|m| m.plugin.as_str()).collect();
    assert_eq!(minimizers, ["CssMinimizerPlugin", "TerserPlugin"]);

    let value = plan.to_value().unwrap();
    assert_eq!(value["devServer"], json!({}));
    assert_eq!(value["stats"], json!("detailed"));
    assert_eq!(value["optimization"]["nodeEnv"], json!("production"));
    assert_eq!(
        value["optimization"]["minimizer"][1]["options"]["terserOptions"]["compress"]["passes"],
        json!(2)
    );
}

#[test]
fn development_plan() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride {
        mode: Some(Mode::Development),
        is_server_running: Some(false),
        ..Default::default()
    }));

    assert!(plan.optimization.is_none());
    assert_eq!(plan.devtool, Devtool::EvalCheapModuleSourceMap);
    assert_eq!(plan.stats, Stats::ErrorsWarnings);

    let dev_server = plan.dev_server.as_ref().unwrap();
    assert!(!dev_server.hot);
    assert!(dev_server.compress);
    assert!(dev_server.history_api_fallback);
    assert_eq!(dev_server.port, 4004);
    assert_eq!(dev_server.static_files.directory, PathBuf::from("/app/public"));
}

#[test]
fn served_production_reports_tersely() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride {
        mode: Some(Mode::Production),
        is_server_running: Some(true),
        ..Default::default()
    }));
    assert_eq!(plan.stats, Stats::ErrorsWarnings);
    assert!(plan.dev_server.is_none());
}

#[test]
fn hot_reload_tracks_server() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride {
        is_server_running: Some(true),
        ..Default::default()
    }));
    assert!(plan.dev_server.unwrap().hot);
}

#[test]
fn output_and_resolve() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride::default()));

    assert_eq!(plan.target, "web");
    assert_eq!(plan.output.path, PathBuf::from("/app/public"));
    assert_eq!(plan.output.public_path, "/");
    assert!(plan.output.filename.contains("[contenthash]"));
    assert_eq!(
        plan.resolve.extensions,
        [".js", ".jsx", ".ts", ".tsx", ".css", ".sass", ".scss", ".json"]
    );
    assert_eq!(plan.resolve.alias.len(), 4);
    assert_eq!(plan.entry.get("js/"), Some(&PathBuf::from("/app/src/index.tsx")));
}

#[test]
fn every_source_type_has_a_rule() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride::default()));

    for file in [
        "src/index.tsx",
        "src/util.ts",
        "src/App.jsx",
        "src/legacy.js",
        "src/app.scss",
        "src/Button.module.scss",
        "src/reset.css",
        "src/Card.module.css",
        "src/assets/images/logo.png",
        "src/assets/images/photo.JPEG",
        "src/assets/icons/close.svg",
        "src/index.pug",
    ] {
        let rules = plan.rules_for(file).unwrap();
        assert_eq!(rules.len(), 1, "{file} matched {} rules", rules.len());
    }

    assert!(plan.rules_for("node_modules/pkg/index.js").unwrap().is_empty());
    assert!(plan.rules_for("README.md").unwrap().is_empty());
}

#[test]
fn style_chains() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride {
        is_server_running: Some(true),
        ..Default::default()
    }));

    let chain = |file: &str| -> Vec<String> {
        plan.rules_for(file).unwrap()[0]
            .loaders()
            .map(str::to_string)
            .collect()
    };

    assert_eq!(
        chain("a.module.sass"),
        ["style-loader", "css-loader", "postcss-loader", "sass-loader"]
    );
    assert_eq!(chain("a.css"), ["style-loader", "css-loader", "postcss-loader"]);

    let rules = plan.rules_for("a.module.css").unwrap();
    let modules = &rules[0].uses[1];
    assert_eq!(
        modules.option("/modules/localIdentName"),
        Some(&json!("[local]--[folder]--[hash:base64:3]"))
    );
}

#[test]
fn asset_rules_use_output_folders() {
    let plan = BuildPlan::assemble(&settings(SettingsOverride::default()));

    let rules = plan.rules_for("logo.webp").unwrap();
    let image = &rules[0].uses[0];
    assert_eq!(image.loader, "file-loader");
    assert_eq!(image.option("/outputPath"), Some(&json!("images")));

    let rules = plan.rules_for("icon.svg").unwrap();
    let svg = rules[0];
    let loaders: Vec<_> = svg.loaders().collect();
    assert_eq!(loaders, ["@svgr/webpack", "url-loader"]);
    assert_eq!(svg.uses[1].option("/outputPath"), Some(&json!("images/icon")));
    assert_eq!(svg.uses[1].option("/limit"), Some(&json!(3000)));
}

#[test]
fn builder_post_assembly_hook() {
    let s = settings(SettingsOverride::default());
    let builder = WebpackBuilder::from_settings(s);

    let plan = builder.build_with(|mut plan| {
        plan.plugins.clear();
        plan
    });
    assert!(plan.plugins.is_empty());
    assert_eq!(builder.build().plugins.len(), 4);
}

#[test]
fn rebuilding_is_deterministic() {
    let s = settings(SettingsOverride::default());
    assert_eq!(BuildPlan::assemble(&s), BuildPlan::assemble(&s));
}

#[test]
fn builder_keeps_updated_public_url_and_port() {
    let builder = WebpackBuilder::from_settings(settings(SettingsOverride::default()))
        .setup_settings(|defaults| ResolvedSettings {
            public_url_or_path: "/static/".to_string(),
            port: 3000,
            ..defaults.clone()
        });

    let value = builder.build().to_value().unwrap();
    assert_eq!(value["output"]["publicPath"], json!("/static/"));
    assert_eq!(value["devServer"]["port"], json!(3000));
}

#[test]
fn plugin_patterns_use_regex_literals() {
    let value = BuildPlan::assemble(&settings(SettingsOverride::default()))
        .to_value()
        .unwrap();

    let circular = &value["plugins"][1];
    assert_eq!(circular["plugin"], json!("CircularDependencyPlugin"));
    assert_eq!(circular["options"]["exclude"], value["module"]["rules"][0]["exclude"]);
    assert_eq!(circular["options"]["exclude"], json!("/node_modules/"));
    assert_eq!(circular["options"]["include"], json!("/react-hook-form/"));
}
