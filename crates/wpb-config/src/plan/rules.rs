//! Module rule tables.
//!
//! Rules are grouped by source kind and concatenated by
//! [`BuildPlan::assemble`](super::BuildPlan::assemble) in the order webpack
//! should consider them: scripts, styles, assets, templates.

use serde_json::json;

use super::types::{Pattern, Rule};
use crate::loaders::{Loaders, UseEntry};
use crate::settings::ResolvedSettings;

const DEPENDENCIES: &str = "node_modules";

/// Inline SVGs below this size (bytes) as data URLs.
const SVG_INLINE_LIMIT: u64 = 3000;

/// TypeScript, JSX and plain JavaScript, all outside `node_modules`.
pub(crate) fn script_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            Pattern::icase(r"\.ts(x?)$"),
            vec![UseEntry::new("babel-loader"), UseEntry::new("ts-loader")],
        )
        .exclude(Pattern::new(DEPENDENCIES)),
        Rule::new(
            Pattern::icase(r"\.jsx$"),
            vec![UseEntry::with_options(
                "babel-loader",
                json!({ "presets": ["@babel/preset-react"] }),
            )],
        )
        .exclude(Pattern::new(DEPENDENCIES)),
        Rule::new(Pattern::icase(r"\.js$"), vec![UseEntry::new("babel-loader")])
            .exclude(Pattern::new(DEPENDENCIES)),
    ]
}

// Module variants come first; plain rules exclude them so each file matches once.
/// Sass and CSS, each split into module and global variants.
pub(crate) fn style_rules(loaders: &Loaders<'_>) -> Vec<Rule> {
    vec![
        Rule::new(
            Pattern::icase(r"\.module\.s[ac]ss$"),
            vec![
                loaders.style_or_extract(),
                loaders.css_modules(),
                loaders.post_css(),
                loaders.sass(),
            ],
        ),
        Rule::new(
            Pattern::icase(r"\.s[ac]ss$"),
            vec![
                loaders.style_or_extract(),
                loaders.css(),
                loaders.post_css(),
                loaders.sass(),
            ],
        )
        .exclude(Pattern::icase(r"\.module\.s[ac]ss$")),
        Rule::new(
            Pattern::icase(r"\.module\.css$"),
            vec![
                loaders.style_or_extract(),
                loaders.css_modules(),
                loaders.post_css(),
            ],
        ),
        Rule::new(
            Pattern::icase(r"\.css$"),
            vec![loaders.style_or_extract(), loaders.css(), loaders.post_css()],
        )
        .exclude(Pattern::icase(r"\.module\.css$")),
    ]
}

/// Raster images and SVGs, emitted under the configured output folders.
pub(crate) fn asset_rules(settings: &ResolvedSettings) -> Vec<Rule> {
    vec![
        Rule::new(
            Pattern::icase(r"\.(avif|webp|png|jpe?g|gif)$"),
            vec![UseEntry::with_options(
                "file-loader",
                json!({
                    "outputPath": settings.output_paths.images,
                    "name": "[name].[ext]",
                    "publicPath": settings.public_url_or_path
                }),
            )],
        )
        .exclude(Pattern::new(r"\.(svg|eot|ttf|woff|woff2)$")),
        Rule::new(
            Pattern::icase(r"\.svg$"),
            vec![
                UseEntry::new("@svgr/webpack"),
                UseEntry::with_options(
                    "url-loader",
                    json!({
                        "limit": SVG_INLINE_LIMIT,
                        "name": "[name].[ext]",
                        "outputPath": settings.output_paths.svg,
                        "publicPath": settings.public_url_or_path
                    }),
                ),
            ],
        )
        .exclude(Pattern::new(DEPENDENCIES)),
    ]
}

pub(crate) fn template_rules(settings: &ResolvedSettings) -> Vec<Rule> {
    vec![Rule::new(
        Pattern::icase(r"\.pug$"),
        vec![UseEntry::with_options(
            "pug-loader",
            json!({ "pretty": settings.dev }),
        )],
    )
    .exclude(Pattern::new(DEPENDENCIES))]
}
