//! Statistic groups an operator can select

use std::fmt;
use std::str::FromStr;

use crate::bind::errors::BindError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticGroup {
    Server,
    View,
    Tasks,
    Traffic,
}

impl StatisticGroup {
    pub fn as_str(&self) -> &'static str {
        match *self {
            StatisticGroup::Server => "server",
            StatisticGroup::View => "view",
            StatisticGroup::Tasks => "tasks",
            StatisticGroup::Traffic => "traffic",
        }
    }
}

impl fmt::Display for StatisticGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticGroup {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(StatisticGroup::Server),
            "view" => Ok(StatisticGroup::View),
            "tasks" | "task" => Ok(StatisticGroup::Tasks),
            "traffic" => Ok(StatisticGroup::Traffic),
            _ => Err(BindError::UnsupportedGroup(s.to_string())),
        }
    }
}

/// An ordered selection of statistic groups without repeats
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticGroups(Vec<StatisticGroup>);

impl StatisticGroups {
    pub fn new<I>(groups: I) -> Result<StatisticGroups, BindError>
    where
        I: IntoIterator<Item = StatisticGroup>,
    {
        let mut selected = Vec::new();
        for group in groups {
            if selected.contains(&group) {
                return Err(BindError::DuplicateGroup(group.to_string()));
            }
            selected.push(group);
        }

        Ok(StatisticGroups(selected))
    }

    /// The groups collected when none are configured: `server,view`
    pub fn defaults() -> StatisticGroups {
        StatisticGroups(vec![StatisticGroup::Server, StatisticGroup::View])
    }

    /// Every group
    pub fn all() -> StatisticGroups {
        StatisticGroups(vec![
            StatisticGroup::Server,
            StatisticGroup::View,
            StatisticGroup::Tasks,
            StatisticGroup::Traffic,
        ])
    }

    pub fn contains(&self, group: StatisticGroup) -> bool {
        self.0.contains(&group)
    }

    pub fn iter(&self) -> impl Iterator<Item = StatisticGroup> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the main server document has to be fetched
    pub fn needs_server_document(&self) -> bool {
        self.contains(StatisticGroup::Server) || self.contains(StatisticGroup::View)
    }
}

impl FromStr for StatisticGroups {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups = s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| item.parse::<StatisticGroup>())
            .collect::<Result<Vec<StatisticGroup>, BindError>>()?;

        StatisticGroups::new(groups)
    }
}

impl fmt::Display for StatisticGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(StatisticGroup::as_str).collect();
        f.write_str(&names.join(","))
    }
}
