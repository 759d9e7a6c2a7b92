//! Calling-convention and model-class tags.
//!
//! A [`SignatureKind`] says how a routine must be called. A [`ModelClass`]
//! says how the fitting engine combines its output; the registry only
//! carries it for introspection.

use std::fmt;
use std::str::FromStr;

/// Calling convention family of a model routine.
///
/// Each kind has exactly one call adapter in `modelmap-registry`; dispatch
/// matches on the handle exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignatureKind {
    /// Buffer-based native call over `f64` slices with a status result.
    Native,
    /// Legacy single-precision Fortran call: `(ear, ne, param, ifl, photar, photer)`.
    Fortran,
    /// C call over `f64` pointers with an auxiliary init string.
    C,
    /// Double-precision variant of [`SignatureKind::Fortran`].
    FortranDouble,
}

impl SignatureKind {
    /// All kinds, in declaration order.
    pub const ALL: [SignatureKind; 4] = [
        SignatureKind::Native,
        SignatureKind::Fortran,
        SignatureKind::C,
        SignatureKind::FortranDouble,
    ];

    /// Split a model table function name into its kind and bare routine name.
    ///
    /// The prefix convention is the one used by XSPEC model tables:
    /// `C_` native, `c_` C, `F_` double Fortran, and no prefix for
    /// single-precision Fortran.
    ///
    /// ```
    /// use modelmap_core::SignatureKind;
    ///
    /// assert_eq!(SignatureKind::from_prefixed("C_apec"), (SignatureKind::Native, "apec"));
    /// assert_eq!(SignatureKind::from_prefixed("xsblbd"), (SignatureKind::Fortran, "xsblbd"));
    /// ```
    pub fn from_prefixed(function: &str) -> (SignatureKind, &str) {
        if let Some(rest) = function.strip_prefix("C_") {
            (SignatureKind::Native, rest)
        } else if let Some(rest) = function.strip_prefix("c_") {
            (SignatureKind::C, rest)
        } else if let Some(rest) = function.strip_prefix("F_") {
            (SignatureKind::FortranDouble, rest)
        } else {
            (SignatureKind::Fortran, function)
        }
    }

    /// The link symbol a shared library exports for `function` under this kind.
    ///
    /// Native routines are C++ and are reached through their `C_` wrapper;
    /// Fortran routines carry the trailing underscore of the Fortran ABI.
    pub fn link_symbol(self, function: &str) -> String {
        match self {
            SignatureKind::Native => format!("C_{function}"),
            SignatureKind::C => function.to_string(),
            SignatureKind::Fortran | SignatureKind::FortranDouble => format!("{function}_"),
        }
    }

    /// Whether the routine is called through raw pointers and so reads
    /// exactly `bins + 1` grid values.
    pub fn is_pointer_based(self) -> bool {
        !matches!(self, SignatureKind::Native)
    }

    /// Short lowercase name used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            SignatureKind::Native => "native",
            SignatureKind::Fortran => "fortran",
            SignatureKind::C => "c",
            SignatureKind::FortranDouble => "fortran-double",
        }
    }
}

impl fmt::Display for SignatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the fitting engine combines a model's output with other components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelClass {
    /// Adds flux (photons/cm^2/s per bin).
    Additive,
    /// Scales flux by a dimensionless factor per bin.
    Multiplicative,
    /// Transforms the flux already in the output buffer.
    Convolution,
}

impl ModelClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelClass::Additive => "add",
            ModelClass::Multiplicative => "mul",
            ModelClass::Convolution => "con",
        }
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(ModelClass::Additive),
            "mul" => Ok(ModelClass::Multiplicative),
            "con" => Ok(ModelClass::Convolution),
            other => Err(format!("unknown model class '{other}'")),
        }
    }
}
