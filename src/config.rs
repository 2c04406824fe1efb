// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Configuration and utilities

#[cfg(feature = "serde")]
pub mod serde_utils;

/// Trace control
///
/// The control selects which kinds of information the
/// [packer][crate::packer::Packer] reports. Information that is not reported
/// is treated as if the trace source never presented it, i.e. a taken branch
/// with `enable_control` unset counts as a plain retirement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Control {
    /// Global enable
    ///
    /// If unset, no trace information is emitted at all.
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub enable: bool,
    /// Report nonsequential events (traps, returns, jumps, taken branches)
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub enable_control: bool,
    /// Report the target address of nonsequential events
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub enable_pc: bool,
    /// Report register file writebacks
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub enable_rfd: bool,
    /// Report breakpoints
    #[cfg_attr(feature = "serde", serde(with = "serde_utils::Flag"))]
    pub enable_breakpoint: bool,
}

impl Control {
    /// Control with every kind of information disabled
    pub const DISABLED: Self = Self {
        enable: false,
        enable_control: false,
        enable_pc: false,
        enable_rfd: false,
        enable_breakpoint: false,
    };
}

/// See [CONTROL] for default values of individual fields
impl Default for Control {
    fn default() -> Self {
        CONTROL
    }
}

/// Default [Control], reporting everything
pub const CONTROL: Control = Control {
    enable: true,
    enable_control: true,
    enable_pc: true,
    enable_rfd: true,
    enable_breakpoint: true,
};

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn control_from_toml() {
        let control: Control =
            toml::from_str("enable_pc = 0\nenable_rfd = false\n").expect("Could not parse");
        assert_eq!(
            control,
            Control {
                enable_pc: false,
                enable_rfd: false,
                ..CONTROL
            }
        );
    }

    #[test]
    fn empty_control() {
        let control: Control = toml::from_str("").expect("Could not parse");
        assert_eq!(control, CONTROL);
    }

    #[test]
    fn bad_flag() {
        assert!(toml::from_str::<Control>("enable = 2").is_err());
    }

    #[test]
    fn serialized_as_ints() {
        let control = toml::to_string(&Control::DISABLED).expect("Could not serialize");
        assert!(control.contains("enable_breakpoint = 0"));
    }
}
