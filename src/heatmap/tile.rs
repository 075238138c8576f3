//! Tile record and the channel selector used to address its weights

/// One of the independently tracked weight series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Position,
    Shooting,
    Running,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Shooting, Channel::Running];

    /// Storage slot of this channel in per-channel arrays
    pub fn index(self) -> usize {
        match self {
            Channel::Position => 0,
            Channel::Shooting => 1,
            Channel::Running => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Position => "position",
            Channel::Shooting => "shooting",
            Channel::Running => "running",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    /// Case-insensitive channel name or short alias (`pos`, `shoot`, `run`)
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "position" | "pos" => Ok(Channel::Position),
            "shooting" | "shoot" => Ok(Channel::Shooting),
            "running" | "run" => Ok(Channel::Running),
            other => Err(format!("unknown channel '{}'", other)),
        }
    }
}

/// Linear weight plus its cached `log10(1 + linear)`.
///
/// The log value is only ever derived from the linear one, so the pair stays
/// consistent through every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelWeight {
    linear: f32,
    log10: f32,
}

impl ChannelWeight {
    pub const ZERO: ChannelWeight = ChannelWeight {
        linear: 0.0,
        log10: 0.0,
    };

    pub fn from_linear(linear: f32) -> Self {
        Self {
            linear,
            log10: (1.0 + linear).log10(),
        }
    }

    pub fn linear(&self) -> f32 {
        self.linear
    }

    pub fn log10(&self) -> f32 {
        self.log10
    }

    /// Add to the linear weight and refresh the log value.
    /// NaN when the sum drops to -1 or below.
    pub fn add(&mut self, weight: f32) {
        *self = Self::from_linear(self.linear + weight);
    }
}

/// Smallest addressable grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatmapTile {
    weights: [ChannelWeight; 3],
}

impl HeatmapTile {
    pub fn new(position: f32, shooting: f32, running: f32) -> Self {
        Self {
            weights: [
                ChannelWeight::from_linear(position),
                ChannelWeight::from_linear(shooting),
                ChannelWeight::from_linear(running),
            ],
        }
    }

    pub fn channel(&self, channel: Channel) -> ChannelWeight {
        self.weights[channel.index()]
    }

    pub(crate) fn channel_mut(&mut self, channel: Channel) -> &mut ChannelWeight {
        &mut self.weights[channel.index()]
    }

    pub fn position_weight(&self) -> f32 {
        self.channel(Channel::Position).linear()
    }

    pub fn position_weight_log10(&self) -> f32 {
        self.channel(Channel::Position).log10()
    }

    pub fn shooting_weight(&self) -> f32 {
        self.channel(Channel::Shooting).linear()
    }

    pub fn shooting_weight_log10(&self) -> f32 {
        self.channel(Channel::Shooting).log10()
    }

    pub fn running_weight(&self) -> f32 {
        self.channel(Channel::Running).linear()
    }

    pub fn running_weight_log10(&self) -> f32 {
        self.channel(Channel::Running).log10()
    }

    /// True when any channel holds weight
    pub fn is_visited(&self) -> bool {
        self.weights.iter().any(|w| w.linear() != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log10_tracks_linear() {
        let mut weight = ChannelWeight::ZERO;
        weight.add(9.0);
        assert_eq!(weight.linear(), 9.0);
        assert!((weight.log10() - 1.0).abs() < 1e-6);

        weight.add(90.0);
        assert!((weight.log10() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_log10_nan_below_minus_one() {
        let mut weight = ChannelWeight::ZERO;
        weight.add(-2.0);
        assert_eq!(weight.linear(), -2.0);
        assert!(weight.log10().is_nan());
    }

    #[test]
    fn test_channels_are_independent() {
        let mut tile = HeatmapTile::default();
        tile.channel_mut(Channel::Shooting).add(3.0);
        assert_eq!(tile.position_weight(), 0.0);
        assert_eq!(tile.shooting_weight(), 3.0);
        assert_eq!(tile.running_weight(), 0.0);
        assert!(tile.is_visited());
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("Run".parse::<Channel>(), Ok(Channel::Running));
        assert_eq!(" pos".parse::<Channel>(), Ok(Channel::Position));
        assert_eq!("SHOOTING".parse::<Channel>(), Ok(Channel::Shooting));
        assert!("jump".parse::<Channel>().is_err());
    }
}
