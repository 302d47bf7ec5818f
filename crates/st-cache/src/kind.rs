//! Closed result-type taxonomy.
//!
//! The source exports label result sheets with string tags and suffixes
//! ("WallShears_V2", "SoilPressures_Min"). Those are decoded once at the
//! ingestion boundary into this enum; nothing downstream parses strings.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Direction qualifier attached to a load-case key.
///
/// X/Y are global plan directions; V2/V3 are element local shear axes;
/// R2/R3 are element local rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    X,
    Y,
    V2,
    V3,
    R2,
    R3,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::X => "X",
            Direction::Y => "Y",
            Direction::V2 => "V2",
            Direction::V3 => "V3",
            Direction::R2 => "R2",
            Direction::R3 => "R3",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which extreme of a time history a sheet carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Extreme {
    Max,
    Min,
}

/// Element local shear axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShearAxis {
    V2,
    V3,
}

/// Element local rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RotationAxis {
    R2,
    R3,
}

/// One result type, as cached and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResultKind {
    StoryDrift(Extreme),
    StoryDisplacement(Extreme),
    StoryAcceleration(Extreme),
    StoryShear(Extreme),
    WallShear(ShearAxis),
    WallRotation,
    ColumnRotation(RotationAxis),
    BeamRotation,
    QuadRotation,
    SoilPressure(Extreme),
    JointDisplacement(Extreme),
}

impl ResultKind {
    /// Story-level (global) kinds cache one entry per story with
    /// direction-qualified load-case keys; element kinds cache one entry per
    /// (element, story); joint kinds one entry per unique name.
    pub fn is_story_level(self) -> bool {
        matches!(
            self,
            ResultKind::StoryDrift(_)
                | ResultKind::StoryDisplacement(_)
                | ResultKind::StoryAcceleration(_)
                | ResultKind::StoryShear(_)
        )
    }

    pub fn is_element_level(self) -> bool {
        matches!(
            self,
            ResultKind::WallShear(_)
                | ResultKind::WallRotation
                | ResultKind::ColumnRotation(_)
                | ResultKind::BeamRotation
                | ResultKind::QuadRotation
        )
    }

    pub fn is_joint_level(self) -> bool {
        matches!(
            self,
            ResultKind::SoilPressure(_) | ResultKind::JointDisplacement(_)
        )
    }

    /// Paired extreme kind, for kinds cached as Max/Min sheet pairs.
    pub fn with_extreme(self, extreme: Extreme) -> Option<ResultKind> {
        match self {
            ResultKind::StoryDrift(_) => Some(ResultKind::StoryDrift(extreme)),
            ResultKind::StoryDisplacement(_) => Some(ResultKind::StoryDisplacement(extreme)),
            ResultKind::StoryAcceleration(_) => Some(ResultKind::StoryAcceleration(extreme)),
            ResultKind::StoryShear(_) => Some(ResultKind::StoryShear(extreme)),
            ResultKind::SoilPressure(_) => Some(ResultKind::SoilPressure(extreme)),
            ResultKind::JointDisplacement(_) => Some(ResultKind::JointDisplacement(extreme)),
            _ => None,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::StoryDrift(e) => write!(f, "StoryDrift/{e:?}"),
            ResultKind::StoryDisplacement(e) => write!(f, "StoryDisplacement/{e:?}"),
            ResultKind::StoryAcceleration(e) => write!(f, "StoryAcceleration/{e:?}"),
            ResultKind::StoryShear(e) => write!(f, "StoryShear/{e:?}"),
            ResultKind::WallShear(a) => write!(f, "WallShear/{a:?}"),
            ResultKind::WallRotation => write!(f, "WallRotation"),
            ResultKind::ColumnRotation(a) => write!(f, "ColumnRotation/{a:?}"),
            ResultKind::BeamRotation => write!(f, "BeamRotation"),
            ResultKind::QuadRotation => write!(f, "QuadRotation"),
            ResultKind::SoilPressure(e) => write!(f, "SoilPressure/{e:?}"),
            ResultKind::JointDisplacement(e) => write!(f, "JointDisplacement/{e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_classes_are_disjoint() {
        let kinds = [
            ResultKind::StoryDrift(Extreme::Max),
            ResultKind::StoryShear(Extreme::Min),
            ResultKind::WallShear(ShearAxis::V2),
            ResultKind::ColumnRotation(RotationAxis::R3),
            ResultKind::BeamRotation,
            ResultKind::QuadRotation,
            ResultKind::SoilPressure(Extreme::Max),
            ResultKind::JointDisplacement(Extreme::Min),
        ];
        for k in kinds {
            let classes = [k.is_story_level(), k.is_element_level(), k.is_joint_level()];
            assert_eq!(classes.iter().filter(|&&c| c).count(), 1, "{k}");
        }
    }

    #[test]
    fn with_extreme_only_for_paired_kinds() {
        assert_eq!(
            ResultKind::StoryDrift(Extreme::Max).with_extreme(Extreme::Min),
            Some(ResultKind::StoryDrift(Extreme::Min))
        );
        assert_eq!(ResultKind::BeamRotation.with_extreme(Extreme::Min), None);
    }
}
