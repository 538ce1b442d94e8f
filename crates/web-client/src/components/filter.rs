use domain::TodoRecord;
use std::fmt;
use std::str::FromStr;

/// 一覧の表示フィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(&self, todo: &TodoRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn apply<'a>(&self, todos: &'a [TodoRecord]) -> Vec<&'a TodoRecord> {
        todos.iter().filter(|t| self.matches(t)).collect()
    }

    pub fn count(&self, todos: &[TodoRecord]) -> usize {
        todos.iter().filter(|t| self.matches(t)).count()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Filter::All => "No todos yet. Add one above!",
            Filter::Active => "No active todos!",
            Filter::Completed => "No completed todos!",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter: {other}")),
        }
    }
}
