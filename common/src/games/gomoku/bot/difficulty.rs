use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

/// How far a single search is allowed to look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthPolicy {
    Fixed(u8),
    IterativeDeepening { budget: Duration },
}

impl Difficulty {
    pub fn depth_policy(self, expert_budget: Duration) -> DepthPolicy {
        match self {
            Difficulty::Easy => DepthPolicy::Fixed(2),
            Difficulty::Medium => DepthPolicy::Fixed(3),
            Difficulty::Hard => DepthPolicy::Fixed(4),
            Difficulty::Expert => DepthPolicy::IterativeDeepening { budget: expert_budget },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("Unknown difficulty '{}', expected easy, medium, hard or expert", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_depths() {
        let budget = Duration::from_millis(5000);
        assert_eq!(Difficulty::Easy.depth_policy(budget), DepthPolicy::Fixed(2));
        assert_eq!(Difficulty::Medium.depth_policy(budget), DepthPolicy::Fixed(3));
        assert_eq!(Difficulty::Hard.depth_policy(budget), DepthPolicy::Fixed(4));
        assert_eq!(
            Difficulty::Expert.depth_policy(budget),
            DepthPolicy::IterativeDeepening { budget }
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("Expert".parse::<Difficulty>(), Ok(Difficulty::Expert));
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string().parse::<Difficulty>(), Ok(Difficulty::Medium));
    }
}
