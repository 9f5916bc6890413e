//! Classification of resolver decisions into package actions.
//!
//! The dependency resolver decides what happens to each package; consumers
//! of a source only care about the coarse outcome. [`describe`] maps one
//! resolved action to an [`ActionDescription`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::package::PackageIdentity;

/// Coarse outcome of a package action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageActionType {
    Install,
    Uninstall,
    Download,
    Purge,
}

impl fmt::Display for PackageActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageActionType::Install => "Install",
            PackageActionType::Uninstall => "Uninstall",
            PackageActionType::Download => "Download",
            PackageActionType::Purge => "Purge",
        };
        f.write_str(name)
    }
}

/// Action kinds produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolverActionKind {
    Install,
    Uninstall,
    /// Add to the shared package cache (`add-to-cache`).
    AddToPackagesFolder,
    /// Remove from the shared package cache (`delete-from-cache`).
    DeleteFromPackagesFolder,
    /// A kind this crate does not know about.
    Other(String),
}

impl FromStr for ResolverActionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "install" => ResolverActionKind::Install,
            "uninstall" => ResolverActionKind::Uninstall,
            "add-to-cache" | "add-to-packages-store" | "add-to-packages-folder" => {
                ResolverActionKind::AddToPackagesFolder
            }
            "delete-from-cache" | "delete-from-packages-store" | "delete-from-packages-folder" => {
                ResolverActionKind::DeleteFromPackagesFolder
            }
            other => ResolverActionKind::Other(other.to_string()),
        })
    }
}

impl fmt::Display for ResolverActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverActionKind::Install => f.write_str("install"),
            ResolverActionKind::Uninstall => f.write_str("uninstall"),
            ResolverActionKind::AddToPackagesFolder => f.write_str("add-to-cache"),
            ResolverActionKind::DeleteFromPackagesFolder => f.write_str("delete-from-cache"),
            ResolverActionKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// The project an action is scoped to.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectIdentity: Send + Sync {
    /// Display name of the project.
    fn project_name(&self) -> String;
}

/// One decision made by the resolver.
#[derive(Clone)]
pub struct ResolvedAction {
    pub kind: ResolverActionKind,
    pub package: PackageIdentity,
    /// Set when the action targets a project rather than the shared
    /// packages folder.
    pub project: Option<Arc<dyn ProjectIdentity>>,
}

impl ResolvedAction {
    pub fn new(kind: ResolverActionKind, package: PackageIdentity) -> Self {
        Self {
            kind,
            package,
            project: None,
        }
    }

    pub fn for_project(mut self, project: Arc<dyn ProjectIdentity>) -> Self {
        self.project = Some(project);
        self
    }
}

impl fmt::Debug for ResolvedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAction")
            .field("kind", &self.kind)
            .field("package", &self.package)
            .field("project", &self.project.as_ref().map(|p| p.project_name()))
            .finish()
    }
}

/// What happened to which package, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescription {
    pub action_type: PackageActionType,
    pub package: PackageIdentity,
    /// Project name for project-scoped actions.
    pub target: Option<String>,
}

impl fmt::Display for ActionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action_type, self.package)?;
        if let Some(target) = &self.target {
            write!(f, " ({})", target)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("Unrecognized package action '{0}'")]
    UnrecognizedAction(String),
}

/// Classify a resolved action.
pub fn describe(action: &ResolvedAction) -> Result<ActionDescription, ActionError> {
    let action_type = match &action.kind {
        ResolverActionKind::Install => PackageActionType::Install,
        ResolverActionKind::Uninstall => PackageActionType::Uninstall,
        ResolverActionKind::AddToPackagesFolder => PackageActionType::Download,
        ResolverActionKind::DeleteFromPackagesFolder => PackageActionType::Purge,
        ResolverActionKind::Other(kind) => {
            return Err(ActionError::UnrecognizedAction(kind.clone()));
        }
    };

    Ok(ActionDescription {
        action_type,
        package: action.package.clone(),
        target: action.project.as_ref().map(|p| p.project_name()),
    })
}
