//! Surface materials and their friction coefficients.

use core::fmt;
use core::str::FromStr;

/// A surface material the block can slide on.
///
/// Each surface maps to exactly one friction coefficient. The set is closed:
/// rendering styles and coefficients are looked up by variant, never by name.
///
/// # Example
///
/// ```rust
/// use incline::Surface;
///
/// let surface: Surface = "rubber".parse().unwrap();
/// assert_eq!(surface, Surface::Rubber);
/// assert_eq!(surface.friction_coefficient(), 0.8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Surface {
    /// Ice, μ = 0.05.
    Ice,
    /// Wood, μ = 0.3. The default surface.
    #[default]
    Wood,
    /// Metal, μ = 0.6.
    Metal,
    /// Rubber, μ = 0.8.
    Rubber,
    /// Concrete, μ = 0.7.
    Concrete,
}

impl Surface {
    /// Every surface, in selection order.
    pub const ALL: [Surface; 5] = [
        Surface::Ice,
        Surface::Wood,
        Surface::Metal,
        Surface::Rubber,
        Surface::Concrete,
    ];

    /// Returns the Coulomb friction coefficient μ for this surface.
    #[inline]
    pub const fn friction_coefficient(self) -> f64 {
        match self {
            Surface::Ice => 0.05,
            Surface::Wood => 0.3,
            Surface::Metal => 0.6,
            Surface::Rubber => 0.8,
            Surface::Concrete => 0.7,
        }
    }

    /// Returns the lowercase name used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Surface::Ice => "ice",
            Surface::Wood => "wood",
            Surface::Metal => "metal",
            Surface::Rubber => "rubber",
            Surface::Concrete => "concrete",
        }
    }

    /// Returns the next surface in selection order, wrapping around.
    pub const fn next(self) -> Surface {
        match self {
            Surface::Ice => Surface::Wood,
            Surface::Wood => Surface::Metal,
            Surface::Metal => Surface::Rubber,
            Surface::Rubber => Surface::Concrete,
            Surface::Concrete => Surface::Ice,
        }
    }

    /// Returns the previous surface in selection order, wrapping around.
    pub const fn previous(self) -> Surface {
        match self {
            Surface::Ice => Surface::Concrete,
            Surface::Wood => Surface::Ice,
            Surface::Metal => Surface::Wood,
            Surface::Rubber => Surface::Metal,
            Surface::Concrete => Surface::Rubber,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a surface name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSurfaceError;

impl fmt::Display for ParseSurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown surface (expected ice, wood, metal, rubber or concrete)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseSurfaceError {}

impl FromStr for Surface {
    type Err = ParseSurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Surface::ALL
            .into_iter()
            .find(|surface| surface.name().eq_ignore_ascii_case(s))
            .ok_or(ParseSurfaceError)
    }
}
