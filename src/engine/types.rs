//! Enumerated values shared by the decision engine and the service layer.

use serde::{Deserialize, Serialize};

/// Caller-declared shipping tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    Preferred,
    Flexible,
}

/// Inferred goods classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Medicine,
    Clothes,
    Fancy,
}

/// Handling-order tier derived from urgency and category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

/// Kind of organization that sent a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Hospital,
    Ngo,
    Govt,
    Retail,
    Luxury,
    Warehouse,
    Business,
}

impl SenderType {
    /// Senders whose verified claims count as medical supply chains.
    pub fn is_institutional(self) -> bool {
        matches!(self, Self::Hospital | Self::Ngo | Self::Govt)
    }
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Preferred => "preferred",
            Self::Flexible => "flexible",
        }
    }
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medicine => "medicine",
            Self::Clothes => "clothes",
            Self::Fancy => "fancy",
        }
    }
}

impl PriorityLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl SenderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Ngo => "ngo",
            Self::Govt => "govt",
            Self::Retail => "retail",
            Self::Luxury => "luxury",
            Self::Warehouse => "warehouse",
            Self::Business => "business",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "preferred" => Ok(Self::Preferred),
            "flexible" => Ok(Self::Flexible),
            _ => Err(format!("Unknown urgency: {}", s)),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medicine" => Ok(Self::Medicine),
            "clothes" => Ok(Self::Clothes),
            "fancy" => Ok(Self::Fancy),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::str::FromStr for PriorityLabel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority label: {}", s)),
        }
    }
}

impl std::str::FromStr for SenderType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hospital" => Ok(Self::Hospital),
            "ngo" => Ok(Self::Ngo),
            "govt" => Ok(Self::Govt),
            "retail" => Ok(Self::Retail),
            "luxury" => Ok(Self::Luxury),
            "warehouse" => Ok(Self::Warehouse),
            "business" => Ok(Self::Business),
            _ => Err(format!("Unknown sender type: {}", s)),
        }
    }
}
