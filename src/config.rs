//! Viewer configuration.
//!
//! The configuration is a JSON file. Every field is optional; missing fields take the values of
//! [`ViewerConfig::default`]. Relative paths inside the file are resolved against the directory
//! the file lives in.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};
use crate::renderer::ShaderSources;
use crate::transform::{MAX_SCALE, MIN_SCALE};

/// The built-in meshes an object can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    Triangle,
    Pyramid,
    /// Loaded from `path` when given, generated otherwise.
    Knot,
}

/// One object of the scene.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObjectConfig {
    pub kind: MeshKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub placement: [f32; 3],
}

impl ObjectConfig {
    pub fn new(kind: MeshKind, placement: [f32; 3]) -> Self {
        Self {
            kind,
            path: None,
            placement,
        }
    }

    pub fn placement(&self) -> Vec3 {
        Vec3::from_array(self.placement)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub clear_color: [f32; 4],
    /// Objects in draw order.
    pub objects: Vec<ObjectConfig>,
    pub vertex_shader: Option<PathBuf>,
    pub fragment_shader: Option<PathBuf>,
    /// Degrees added per rotation key press.
    pub rotation_step: f32,
    /// Factor added per scale key press.
    pub scale_step: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub gl_debug: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "meshview".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
            clear_color: [0.37, 0.42, 0.45, 0.0],
            objects: vec![
                ObjectConfig::new(MeshKind::Pyramid, [-2.0, 0.0, -6.0]),
                ObjectConfig::new(MeshKind::Knot, [2.0, 0.0, -6.0]),
            ],
            vertex_shader: None,
            fragment_shader: None,
            rotation_step: 5.0,
            scale_step: 0.1,
            min_scale: 0.1,
            max_scale: 2.0,
            log_level: "info".to_string(),
            log_file: None,
            gl_debug: true,
        }
    }
}

impl ViewerConfig {
    /// Default location of the configuration file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("meshview").join("config.json"))
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one the default location is tried, and the
    /// defaults are used if nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    let config = Self::default();
                    config.validate()?;
                    Ok(config)
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the viewer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let scale_range = MIN_SCALE..=MAX_SCALE;
        if !(scale_range.contains(&self.min_scale)
            && scale_range.contains(&self.max_scale)
            && self.min_scale <= self.max_scale)
        {
            return Err(ViewerError::Config(format!(
                "scale range must satisfy {MIN_SCALE} <= min_scale <= max_scale <= {MAX_SCALE}, \
                 got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.scale_step > 0.0 && self.rotation_step > 0.0) {
            return Err(ViewerError::Config(
                "rotation_step and scale_step must be positive".to_string(),
            ));
        }
        if let Some(object) = self
            .objects
            .iter()
            .find(|object| !object.placement().is_finite())
        {
            return Err(ViewerError::Config(format!(
                "placement of {:?} is not finite",
                object.kind
            )));
        }
        self.level_filter()?;
        Ok(())
    }

    /// The configured log level. `MESHVIEW_LOG` takes precedence when set.
    pub fn level_filter(&self) -> Result<log::LevelFilter> {
        let level = std::env::var("MESHVIEW_LOG").unwrap_or_else(|_| self.log_level.clone());
        log::LevelFilter::from_str(&level)
            .map_err(|_| ViewerError::Config(format!("unknown log level '{level}'")))
    }

    /// Reads the configured shader files, using the built-in source for any stage left unset.
    pub fn shader_sources(&self) -> Result<ShaderSources> {
        let builtin = ShaderSources::builtin();
        let vertex = match &self.vertex_shader {
            Some(path) => std::fs::read_to_string(path)?,
            None => builtin.vertex,
        };
        let fragment = match &self.fragment_shader {
            Some(path) => std::fs::read_to_string(path)?,
            None => builtin.fragment,
        };
        Ok(ShaderSources::new(vertex, fragment))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        for object in &mut self.objects {
            if let Some(path) = &mut object.path {
                resolve(path);
            }
        }
        if let Some(path) = &mut self.vertex_shader {
            resolve(path);
        }
        if let Some(path) = &mut self.fragment_shader {
            resolve(path);
        }
        if let Some(path) = &mut self.log_file {
            resolve(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.objects.len(), 2);
        assert_eq!(config.objects[0].kind, MeshKind::Pyramid);
        assert_eq!(config.objects[1].placement(), Vec3::new(2.0, 0.0, -6.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(
            r#"{
                "width": 1024,
                "objects": [
                    { "kind": "triangle", "placement": [0.0, 0.0, -4.0] },
                    { "kind": "knot", "path": "knot.obj", "placement": [2.0, 0.0, -6.0] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 600);
        assert_eq!(config.objects[0].kind, MeshKind::Triangle);
        assert_eq!(config.objects[1].path, Some(PathBuf::from("knot.obj")));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ViewerConfig::from_json(r#"{ "height": 0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "min_scale": 0.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "min_scale": 3.0, "max_scale": 2.0 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "min_scale": 1e-6 }"#).is_err());
        assert!(ViewerConfig::from_json(r#"{ "max_scale": 1e9 }"#).is_err());
        assert!(
            ViewerConfig::from_json(
                r#"{ "objects": [{ "kind": "cube", "placement": [0, 0, 0] }] }"#
            )
            .is_err()
        );
        assert!(ViewerConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let mut config = ViewerConfig::from_json(
            r#"{ "objects": [{ "kind": "knot", "path": "models/knot.obj", "placement": [0, 0, 0] }],
                 "vertex_shader": "/abs/vert.glsl" }"#,
        )
        .unwrap();
        config.resolve_paths(Path::new("/etc/meshview"));

        assert_eq!(
            config.objects[0].path,
            Some(PathBuf::from("/etc/meshview/models/knot.obj"))
        );
        assert_eq!(config.vertex_shader, Some(PathBuf::from("/abs/vert.glsl")));
    }

    #[test]
    fn test_builtin_shaders_without_paths() {
        let sources = ViewerConfig::default().shader_sources().unwrap();
        assert!(sources.vertex.contains("modelTransform"));
        assert!(sources.fragment.contains("fragColor"));
    }
}
