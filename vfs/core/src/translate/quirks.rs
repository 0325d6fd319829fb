//! Per-operation, per-platform corrections applied after the base tables.
//!
//! Each row keys on `(operation, platform, native errno)`. A row with no
//! platform applies everywhere. Keys never overlap, so lookup order does not
//! matter.

use crate::{Errno, FileKind};

use super::{KindProbe, Op, Operands, Platform};

/// Which operand a [`Resolution::ByKind`] probe inspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Path,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Always report this errno instead.
    Replace(Errno),
    /// Probe one operand: a directory yields `directory`, any other existing
    /// entry yields `other`. `None` or an absent entry keeps the native value.
    ByKind {
        operand: Operand,
        follow: bool,
        directory: Option<Errno>,
        other: Option<Errno>,
    },
    /// Probe both rename operands to name the conflict.
    RenameConflict,
}

impl Resolution {
    pub fn resolve(self, native: Errno, operands: &Operands<'_>, probe: &dyn KindProbe) -> Errno {
        match self {
            Resolution::Replace(errno) => errno,
            Resolution::ByKind {
                operand,
                follow,
                directory,
                other,
            } => {
                let path = match operand {
                    Operand::Path => Some(operands.path),
                    Operand::Other => operands.other,
                };
                let kind = path.and_then(|p| probe.kind(p, follow));
                match kind {
                    Some(FileKind::Directory) => directory.unwrap_or(native),
                    Some(_) => other.unwrap_or(native),
                    None => native,
                }
            }
            Resolution::RenameConflict => rename_conflict(native, operands, probe),
        }
    }
}

fn rename_conflict(native: Errno, operands: &Operands<'_>, probe: &dyn KindProbe) -> Errno {
    let Some(to) = operands.other else {
        return native;
    };
    let (Some(from_kind), Some(to_kind)) =
        (probe.kind(operands.path, false), probe.kind(to, false))
    else {
        return native;
    };
    match (from_kind.is_dir(), to_kind.is_dir()) {
        (false, true) => Errno::IsDir,
        (true, false) => Errno::NotDir,
        // Some platforms refuse to replace a directory even when it is empty.
        (true, true) if probe.is_empty_dir(to) => Errno::Exist,
        (true, true) => Errno::NotEmpty,
        (false, false) => native,
    }
}

#[derive(Clone, Copy, Debug)]
pub struct QuirkRule {
    pub op: Op,
    pub platform: Option<Platform>,
    pub native: Errno,
    pub resolution: Resolution,
}

const fn by_kind(
    operand: Operand,
    follow: bool,
    directory: Option<Errno>,
    other: Option<Errno>,
) -> Resolution {
    Resolution::ByKind {
        operand,
        follow,
        directory,
        other,
    }
}

pub const QUIRK_RULES: &[QuirkRule] = &[
    // mkdir over an existing file.
    QuirkRule {
        op: Op::Mkdir,
        platform: None,
        native: Errno::Exist,
        resolution: by_kind(Operand::Path, true, Some(Errno::Exist), Some(Errno::NotDir)),
    },
    // Windows reports "not found" when rmdir targets a file.
    QuirkRule {
        op: Op::Rmdir,
        platform: Some(Platform::Windows),
        native: Errno::NoEnt,
        resolution: by_kind(Operand::Path, false, None, Some(Errno::NotDir)),
    },
    QuirkRule {
        op: Op::Rmdir,
        platform: Some(Platform::Posix),
        native: Errno::Exist,
        resolution: Resolution::Replace(Errno::NotEmpty),
    },
    QuirkRule {
        op: Op::Rename,
        platform: None,
        native: Errno::Exist,
        resolution: Resolution::RenameConflict,
    },
    // Windows cannot replace a directory and says "access denied".
    QuirkRule {
        op: Op::Rename,
        platform: Some(Platform::Windows),
        native: Errno::Access,
        resolution: Resolution::RenameConflict,
    },
    // Darwin reports EPERM for unlink on a directory.
    QuirkRule {
        op: Op::Unlink,
        platform: Some(Platform::Posix),
        native: Errno::Perm,
        resolution: by_kind(Operand::Path, false, Some(Errno::IsDir), None),
    },
    QuirkRule {
        op: Op::Unlink,
        platform: Some(Platform::Windows),
        native: Errno::Access,
        resolution: by_kind(Operand::Path, false, Some(Errno::IsDir), None),
    },
    QuirkRule {
        op: Op::Link,
        platform: None,
        native: Errno::Exist,
        resolution: by_kind(Operand::Other, false, Some(Errno::IsDir), None),
    },
    // Creating symbolic links needs SeCreateSymbolicLinkPrivilege.
    QuirkRule {
        op: Op::Symlink,
        platform: Some(Platform::Windows),
        native: Errno::Access,
        resolution: Resolution::Replace(Errno::Perm),
    },
    QuirkRule {
        op: Op::OpenFile,
        platform: Some(Platform::Windows),
        native: Errno::Access,
        resolution: by_kind(Operand::Path, true, Some(Errno::IsDir), None),
    },
];

pub fn rule_for(op: Op, platform: Platform, native: Errno) -> Option<&'static QuirkRule> {
    QUIRK_RULES.iter().find(|rule| {
        rule.op == op && rule.native == native && rule.platform.is_none_or(|p| p == platform)
    })
}
