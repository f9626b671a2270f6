//! Alerts, chat and effects carried over from one observation.

use sc2_state_core::{Alliance, EffectId, Point2, RawChat, RawEffect};

/// Notification raised by the game for the observing player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alert {
    /// Generic error alert.
    AlertError,
    /// An add-on finished building.
    AddOnComplete,
    /// A structure finished building.
    BuildingComplete,
    /// A structure is under attack.
    BuildingUnderAttack,
    /// Larva hatched.
    LarvaHatched,
    /// An archon merge finished.
    MergeComplete,
    /// A mineral field ran dry.
    MineralsExhausted,
    /// A morph finished.
    MorphComplete,
    /// The mothership finished.
    MothershipComplete,
    /// A MULE expired.
    MuleExpired,
    /// A nuclear launch was detected.
    NuclearLaunchDetected,
    /// A nuke finished arming.
    NukeComplete,
    /// A nydus worm was detected.
    NydusWormDetected,
    /// A research finished.
    ResearchComplete,
    /// Training failed.
    TrainError,
    /// A unit finished training.
    TrainUnitComplete,
    /// A worker finished training.
    TrainWorkerComplete,
    /// A transformation finished.
    TransformationComplete,
    /// A unit is under attack.
    UnitUnderAttack,
    /// An upgrade finished.
    UpgradeComplete,
    /// A geyser ran dry.
    VespeneExhausted,
    /// A warp-in finished.
    WarpInComplete,
    /// Code outside the known range.
    Unknown(u32),
}

impl Alert {
    /// Maps a raw alert code.
    #[must_use]
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Self::AlertError,
            2 => Self::AddOnComplete,
            3 => Self::BuildingComplete,
            4 => Self::BuildingUnderAttack,
            5 => Self::LarvaHatched,
            6 => Self::MergeComplete,
            7 => Self::MineralsExhausted,
            8 => Self::MorphComplete,
            9 => Self::MothershipComplete,
            10 => Self::MuleExpired,
            11 => Self::NuclearLaunchDetected,
            12 => Self::NukeComplete,
            13 => Self::NydusWormDetected,
            14 => Self::ResearchComplete,
            15 => Self::TrainError,
            16 => Self::TrainUnitComplete,
            17 => Self::TrainWorkerComplete,
            18 => Self::TransformationComplete,
            19 => Self::UnitUnderAttack,
            20 => Self::UpgradeComplete,
            21 => Self::VespeneExhausted,
            22 => Self::WarpInComplete,
            other => Self::Unknown(other),
        }
    }
}

/// Chat line received during a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender's player id.
    pub player_id: u32,
    /// Message body.
    pub message: String,
}

impl From<&RawChat> for ChatMessage {
    fn from(raw: &RawChat) -> Self {
        Self {
            player_id: raw.player_id,
            message: raw.message.clone(),
        }
    }
}

/// Area effect active on the map.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectData {
    /// Effect identifier.
    pub id: EffectId,
    /// Covered positions.
    pub positions: Vec<Point2>,
    /// Relationship between the effect's owner and the observer, when known.
    pub alliance: Option<Alliance>,
    /// Owning player id.
    pub owner: u32,
    /// Radius around each position.
    pub radius: f64,
}

impl EffectData {
    /// Whether the effect was cast by an opponent.
    #[must_use]
    pub fn is_enemy(&self) -> bool {
        self.alliance == Some(Alliance::Enemy)
    }
}

impl From<&RawEffect> for EffectData {
    fn from(raw: &RawEffect) -> Self {
        Self {
            id: EffectId::new(raw.effect_id),
            positions: raw.pos.clone(),
            alliance: raw.alliance,
            owner: raw.owner,
            radius: raw.radius,
        }
    }
}
