use std::fmt;
use std::str::FromStr;

/// Visual modes a focus surface can show.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ModeId {
    #[default]
    Ice,
    Flight,
    Orbit,
    Ripple,
    Growth,
    Drift,
}

impl ModeId {
    pub const COUNT: usize = 6;

    pub const ALL: [ModeId; Self::COUNT] = [
        ModeId::Ice,
        ModeId::Flight,
        ModeId::Orbit,
        ModeId::Ripple,
        ModeId::Growth,
        ModeId::Drift,
    ];

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            ModeId::Ice => "ice",
            ModeId::Flight => "flight",
            ModeId::Orbit => "orbit",
            ModeId::Ripple => "ripple",
            ModeId::Growth => "growth",
            ModeId::Drift => "drift",
        }
    }

    /// Position in `ALL`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Next mode in `ALL`, wrapping around.
    pub fn next(self) -> ModeId {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mode name that matches no known mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for ModeId {
    type Err = UnknownMode;

    /// Case-insensitive; accepts the long names "ice melting" and "water ripple".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "ice" | "ice melting" => Ok(ModeId::Ice),
            "flight" => Ok(ModeId::Flight),
            "orbit" => Ok(ModeId::Orbit),
            "ripple" | "water ripple" => Ok(ModeId::Ripple),
            "growth" => Ok(ModeId::Growth),
            "drift" => Ok(ModeId::Drift),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("ice".parse(), Ok(ModeId::Ice));
        assert_eq!("Ice Melting".parse(), Ok(ModeId::Ice));
        assert_eq!("WATER RIPPLE".parse(), Ok(ModeId::Ripple));
        assert_eq!(" drift ".parse(), Ok(ModeId::Drift));
        for mode in ModeId::ALL {
            assert_eq!(mode.name().parse(), Ok(mode));
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = "volcano".parse::<ModeId>().unwrap_err();
        assert_eq!(err, UnknownMode("volcano".into()));
        assert_eq!(err.to_string(), "unknown mode: volcano");
    }

    #[test]
    fn next_cycles_through_all() {
        let mut mode = ModeId::Ice;
        for _ in 0..ModeId::COUNT {
            mode = mode.next();
        }
        assert_eq!(mode, ModeId::Ice);
        assert_eq!(ModeId::Growth.next(), ModeId::Drift);
    }
}
