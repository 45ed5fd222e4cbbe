// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types of the rendering side.

use std::fmt;

/// An error related to the creation, upload or use of a GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A handle does not refer to a live resource.
    NotFound {
        /// The resource kind, e.g. `"texture"`.
        kind: &'static str,
        /// The raw handle.
        id: usize,
    },
    /// An upload does not fit in its destination.
    OutOfBounds {
        /// The resource kind, e.g. `"vertex buffer"`.
        kind: &'static str,
        /// Bytes written.
        requested: u64,
        /// Bytes available.
        capacity: u64,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound { kind, id } => {
                write!(f, "No live {kind} with id {id}")
            }
            ResourceError::OutOfBounds {
                kind,
                requested,
                capacity,
            } => write!(
                f,
                "Upload of {requested} bytes exceeds {kind} capacity of {capacity} bytes"
            ),
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// An error of the per-frame UI and present cycle.
#[derive(Debug)]
pub enum RenderError {
    /// The next frame could not be acquired from the surface.
    SurfaceAcquisitionFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SurfaceAcquisitionFailed(msg) => {
                write!(f, "Failed to acquire surface for rendering: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::SurfaceAcquisitionFailed(_) => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::OutOfBounds {
            kind: "index buffer",
            requested: 48,
            capacity: 24,
        };
        assert_eq!(
            err.to_string(),
            "Upload of 48 bytes exceeds index buffer capacity of 24 bytes"
        );
        assert_eq!(
            ResourceError::NotFound {
                kind: "texture",
                id: 3
            }
            .to_string(),
            "No live texture with id 3"
        );
    }

    #[test]
    fn test_render_error_wraps_resource_error() {
        let err: RenderError = ResourceError::BackendError("oom".into()).into();
        assert!(matches!(err, RenderError::ResourceError(_)));
        assert!(err.source().is_some());
        assert!(RenderError::SurfaceAcquisitionFailed("timeout".into())
            .source()
            .is_none());
    }
}
