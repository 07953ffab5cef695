use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Web frameworks the CLI can scaffold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Next.js (app router)
    #[default]
    #[value(name = "nextjs")]
    NextJs,
    /// Vite + React
    Vite,
}

impl Framework {
    /// Env file the framework loads credentials from
    pub fn env_file(&self) -> &'static str {
        match self {
            Framework::NextJs => ".env.local",
            Framework::Vite => ".env",
        }
    }

    /// Prefix that exposes a variable to client-side code
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Framework::NextJs => "NEXT_PUBLIC_PRIVY_",
            Framework::Vite => "VITE_PRIVY_",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::NextJs => "Next.js",
            Framework::Vite => "Vite (React)",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framework::NextJs => write!(f, "nextjs"),
            Framework::Vite => write!(f, "vite"),
        }
    }
}
