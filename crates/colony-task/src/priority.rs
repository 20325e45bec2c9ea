use core::fmt;
use core::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Task urgency. Ordered: `Idle < Low < Medium < High < Urgent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    Idle,
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Idle => "idle",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

/// Bitmask of work kinds. A task's category must be fully contained in a worker's permitted
/// categories for the worker to be eligible.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category(u32);

const NAMES: [(&str, Category); 7] = [
    ("move", Category::MOVE),
    ("dig", Category::DIG),
    ("attack", Category::ATTACK),
    ("summon", Category::SUMMON),
    ("gather", Category::GATHER),
    ("guard", Category::GUARD),
    ("build", Category::BUILD),
];

impl Category {
    pub const NONE: Category = Category(0);
    pub const MOVE: Category = Category(1 << 0);
    pub const DIG: Category = Category(1 << 1);
    pub const ATTACK: Category = Category(1 << 2);
    pub const SUMMON: Category = Category(1 << 3);
    pub const GATHER: Category = Category(1 << 4);
    pub const GUARD: Category = Category(1 << 5);
    pub const BUILD: Category = Category(1 << 6);
    pub const ALL: Category = Category((1 << 7) - 1);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: Category) -> Category {
        Category(self.0 | other.0)
    }

    /// `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Category) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    pub fn from_name(name: &str) -> Option<Category> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("all") {
            return Some(Category::ALL);
        }
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    pub fn names(self) -> impl Iterator<Item = &'static str> {
        NAMES
            .iter()
            .filter(move |(_, c)| self.contains(*c))
            .map(|(n, _)| *n)
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Category) -> Category {
        self.union(rhs)
    }
}

impl BitOrAssign for Category {
    fn bitor_assign(&mut self, rhs: Category) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
