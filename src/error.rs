//! Error types
//!
//! Every recoverable failure in the crate is a variant of [`Error`]. Callers
//! that choose to keep running after a failure hand it to [`report`] so the
//! diagnostic ends up in one place.

use std::path::PathBuf;

/// Errors produced by penumbra.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A shadow map was requested with a zero dimension.
    #[error("shadow map has no width or height ({width}x{height})")]
    ZeroShadowMapSize { width: u32, height: u32 },

    /// A cube shadow map was requested with unequal face dimensions.
    #[error("cube shadow map faces must be square ({width}x{height})")]
    NonSquareCubeMap { width: u32, height: u32 },

    /// More point lights were added than the lighting shader supports.
    #[error("too many point lights (maximum is {max})")]
    TooManyPointLights { max: usize },

    /// An image file could not be opened or decoded.
    #[error("failed to load image {path:?}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A shader source file could not be read.
    #[error("failed to read shader {path:?}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Log a failure the caller has decided to recover from.
pub fn report(context: &str, error: Error) {
    tracing::error!(target: "penumbra", "{}", describe(context, error));
}

/// `context: error: source: ...`, formatted the same way as failures that
/// reach the window loop.
fn describe(context: &str, error: Error) -> String {
    format!("{:#}", anyhow::Error::from(error).context(context.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_shadow_map_message() {
        let err = Error::ZeroShadowMapSize {
            width: 0,
            height: 1024,
        };
        assert_eq!(err.to_string(), "shadow map has no width or height (0x1024)");
    }

    #[test]
    fn test_shader_read_keeps_source() {
        let err = Error::ShaderRead {
            path: PathBuf::from("shaders/missing.wgsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("gone"));
    }

    #[test]
    fn test_describe_includes_context_and_sources() {
        let err = Error::ShaderRead {
            path: PathBuf::from("lit.wgsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(
            describe("using built-in shader", err),
            "using built-in shader: failed to read shader \"lit.wgsl\": gone"
        );
    }
}
