//! Run configuration: manifest values with command-line overrides applied.

use std::path::PathBuf;

use image::Rgba;
use palette::Srgb;

use crate::classify::BlockSelection;
use crate::discovery::{Manifest, Project, MANIFEST_FILENAME};
use crate::error::{Result, TileError};
use crate::render::Watermark;
use crate::slice::DEFAULT_TRANSPARENCY_THRESHOLD;

/// Per-stage pipeline settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub cell_size: u32,
    /// Absolute output directory.
    pub output_dir: PathBuf,
    pub transparency_threshold: f64,
    pub allow_list_enabled: bool,
    /// Lower bound for each atlas edge.
    pub atlas_min_size: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cell_size: 16,
            output_dir: PathBuf::from("assets/generated"),
            transparency_threshold: DEFAULT_TRANSPARENCY_THRESHOLD,
            allow_list_enabled: true,
            atlas_min_size: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_min_size(mut self, min_size: Option<u32>) -> Self {
        self.atlas_min_size = min_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(config_error("cell_size must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.transparency_threshold) {
            return Err(config_error(format!(
                "transparency_threshold must be between 0 and 1, got {}",
                self.transparency_threshold
            )));
        }
        if let Some(min) = self.atlas_min_size {
            if !min.is_power_of_two() {
                return Err(config_error(format!(
                    "min_atlas_size must be a power of two, got {}",
                    min
                )));
            }
        }
        Ok(())
    }
}

/// Values given on the command line; `None`/`false` leaves the manifest alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub no_allow_list: bool,
    pub all_blocks: bool,
}

/// Everything one `build` run needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub manifest: Manifest,
    /// Shared settings; families adjust `atlas_min_size`.
    pub pipeline: PipelineConfig,
    pub all_blocks: bool,
    pub debug_colour: Rgba<u8>,
    pub watermark: Option<Watermark>,
}

impl Settings {
    /// Merge `overrides` over the project's manifest and validate the result.
    pub fn resolve(project: &Project, overrides: &Overrides) -> Result<Self> {
        let manifest = project.manifest.clone();

        let output = overrides.output.as_ref().unwrap_or(&manifest.output);
        let pipeline = PipelineConfig {
            cell_size: manifest.cell_size,
            output_dir: project.path(output),
            transparency_threshold: overrides
                .threshold
                .unwrap_or(manifest.transparency_threshold),
            allow_list_enabled: manifest.allow_list && !overrides.no_allow_list,
            atlas_min_size: None,
        };
        pipeline.validate()?;

        let debug_colour = parse_hex_colour(&manifest.debug_colour)?;
        let watermark = manifest
            .watermark
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(Watermark::new);

        Ok(Self {
            root: project.root.clone(),
            all_blocks: manifest.all_blocks || overrides.all_blocks,
            manifest,
            pipeline,
            debug_colour,
            watermark,
        })
    }

    /// Block policy for autotile sheets when no used-name set applies.
    pub fn default_blocks(&self) -> BlockSelection {
        if self.all_blocks {
            BlockSelection::All
        } else {
            BlockSelection::First(self.manifest.block_limit)
        }
    }

    /// Resolve a project-relative path.
    pub fn path(&self, relative: impl AsRef<std::path::Path>) -> PathBuf {
        self.root.join(relative)
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into an RGBA pixel.
pub fn parse_hex_colour(text: &str) -> Result<Rgba<u8>> {
    let hex = text.trim().trim_start_matches('#');
    let (rgb, alpha) = match hex.len() {
        8 if hex.is_ascii() => (&hex[..6], u8::from_str_radix(&hex[6..], 16).ok()),
        _ => (hex, Some(255)),
    };

    let colour = rgb.parse::<Srgb<u8>>().ok().zip(alpha);
    match colour {
        Some((c, a)) => Ok(Rgba([c.red, c.green, c.blue, a])),
        None => Err(TileError::Config {
            message: format!("Invalid debug colour '{}'", text),
            help: Some(format!(
                "Use a hex colour such as \"#ffa500\" in {}",
                MANIFEST_FILENAME
            )),
        }),
    }
}

fn config_error(message: impl Into<String>) -> TileError {
    TileError::Config {
        message: message.into(),
        help: Some(format!("Check {}", MANIFEST_FILENAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_at;
    use crate::render::DEFAULT_WATERMARK;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_hex_colour() {
        assert_eq!(parse_hex_colour("#ffa500").unwrap(), Rgba([255, 165, 0, 255]));
        assert_eq!(parse_hex_colour("00ff00").unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(parse_hex_colour("#f00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_hex_colour("#10203080").unwrap(), Rgba([16, 32, 48, 128]));
    }

    #[test]
    fn test_parse_hex_colour_rejects_garbage() {
        for bad in ["orange", "#12", "#gg0000", "#ffa500zz"] {
            assert!(
                matches!(parse_hex_colour(bad), Err(TileError::Config { .. })),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_pipeline_config_validation() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert!(PipelineConfig {
            cell_size: 0,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(PipelineConfig {
            transparency_threshold: 1.5,
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(PipelineConfig::default()
            .with_min_size(Some(200))
            .validate()
            .is_err());
        assert!(PipelineConfig::default()
            .with_min_size(Some(256))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_resolve_defaults() {
        let dir = tempdir().unwrap();
        let project = discover_at(dir.path()).unwrap();

        let settings = Settings::resolve(&project, &Overrides::default()).unwrap();

        assert_eq!(settings.pipeline.output_dir, dir.path().join("assets/generated"));
        assert_eq!(settings.pipeline.transparency_threshold, 0.1);
        assert!(settings.pipeline.allow_list_enabled);
        assert_eq!(settings.debug_colour, Rgba([255, 165, 0, 255]));
        assert_eq!(settings.watermark, Some(Watermark::new(DEFAULT_WATERMARK)));
        assert_eq!(settings.default_blocks(), BlockSelection::First(7));
    }

    #[test]
    fn test_overrides_beat_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "output: build\ntransparency_threshold: 0.5\nwatermark: \"\"\n",
        )
        .unwrap();
        let project = discover_at(dir.path()).unwrap();

        let overrides = Overrides {
            output: Some(PathBuf::from("out")),
            threshold: Some(0.2),
            no_allow_list: true,
            all_blocks: true,
        };
        let settings = Settings::resolve(&project, &overrides).unwrap();

        assert_eq!(settings.pipeline.output_dir, dir.path().join("out"));
        assert_eq!(settings.pipeline.transparency_threshold, 0.2);
        assert!(!settings.pipeline.allow_list_enabled);
        assert_eq!(settings.watermark, None);
        assert_eq!(settings.default_blocks(), BlockSelection::All);
    }

    #[test]
    fn test_resolve_rejects_bad_threshold() {
        let dir = tempdir().unwrap();
        let project = discover_at(dir.path()).unwrap();
        let overrides = Overrides {
            threshold: Some(-0.1),
            ..Default::default()
        };
        assert!(Settings::resolve(&project, &overrides).is_err());
    }
}
