use crate::error::{QueryError, Result};
use crate::models::Conditions;
use crate::query::{parse_amount, parse_date, parse_row_limit, summary};

/// Line-oriented terminal I/O, swappable in tests.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String>;
    fn say(&mut self, line: &str);
}

/// Ask until the answer is yes or no.
pub fn ask_yes_no(p: &mut dyn Prompter, prompt: &str) -> Result<bool> {
    loop {
        match p.ask(prompt)?.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => p.say("Please answer 'yes' or 'no'."),
        }
    }
}

/// Ask until `parse` accepts the answer, reporting each rejection.
fn ask_valid<T>(
    p: &mut dyn Prompter,
    prompt: &str,
    parse: impl Fn(&str) -> std::result::Result<T, QueryError>,
) -> Result<String> {
    loop {
        let answer = p.ask(prompt)?.trim().to_string();
        match parse(&answer) {
            Ok(_) => return Ok(answer),
            Err(e) => p.say(&format!("{e}. Try again.")),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Dates,
    Amounts,
    RowLimit,
}

impl Group {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dates => "Dates",
            Self::Amounts => "Total Amount",
            Self::RowLimit => "Number of Rows",
        }
    }
}

/// Whether a group has been edited during this session. Editing a `Set`
/// group again needs an explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupState {
    #[default]
    Unset,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Edit(Group),
    RetrieveAll,
    RetrieveCurrent,
    Return,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Edit(Group::Dates)),
            "2" => Some(Self::Edit(Group::Amounts)),
            "3" => Some(Self::Edit(Group::RowLimit)),
            "4" => Some(Self::RetrieveAll),
            "5" => Some(Self::RetrieveCurrent),
            "6" => Some(Self::Return),
            _ => None,
        }
    }
}

pub const PANEL_MENU: &[&str] = &[
    "1. Date",
    "2. Total Amount",
    "3. Number of Rows",
    "4. Retrieve All data",
    "5. Retrieve With Current Condition",
    "6. Return to Main",
];

#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Continue,
    /// Fetch orders for these conditions; `leave` closes the panel afterwards.
    Retrieve { conditions: Conditions, leave: bool },
    Leave,
}

#[derive(Debug, Default)]
pub struct ConditionPanel {
    conditions: Conditions,
    dates: GroupState,
    amounts: GroupState,
    row_limit: GroupState,
}

impl ConditionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn state(&self, group: Group) -> GroupState {
        match group {
            Group::Dates => self.dates,
            Group::Amounts => self.amounts,
            Group::RowLimit => self.row_limit,
        }
    }

    fn mark_set(&mut self, group: Group) {
        match group {
            Group::Dates => self.dates = GroupState::Set,
            Group::Amounts => self.amounts = GroupState::Set,
            Group::RowLimit => self.row_limit = GroupState::Set,
        }
    }

    pub fn step(&mut self, input: &str, p: &mut dyn Prompter) -> Result<PanelAction> {
        let Some(choice) = MenuChoice::parse(input) else {
            p.say("Not a valid category");
            return Ok(PanelAction::Continue);
        };
        match choice {
            MenuChoice::Edit(group) => {
                self.edit(group, p)?;
                Ok(PanelAction::Continue)
            }
            MenuChoice::RetrieveAll => {
                p.say("Retrieving All data");
                Ok(PanelAction::Retrieve {
                    conditions: Conditions::default(),
                    leave: false,
                })
            }
            MenuChoice::RetrieveCurrent => {
                p.say(&format!(
                    "Retrieving Data with conditions: {}",
                    summary(&self.conditions)
                ));
                Ok(PanelAction::Retrieve {
                    conditions: self.conditions.clone(),
                    leave: true,
                })
            }
            MenuChoice::Return => Ok(PanelAction::Leave),
        }
    }

    fn edit(&mut self, group: Group, p: &mut dyn Prompter) -> Result<()> {
        if self.state(group) == GroupState::Set {
            let prompt = format!(
                "{} Already Specified. Do you want to Override? yes/no",
                group.label()
            );
            if !ask_yes_no(p, &prompt)? {
                return Ok(());
            }
        }
        match group {
            Group::Dates => {
                let start = ask_valid(p, "Enter Starting Date: (format yyyy-mm-dd)", parse_date)?;
                let end = ask_valid(p, "Enter End Date: (format yyyy-mm-dd)", parse_date)?;
                self.conditions.set_dates(start, end);
            }
            Group::Amounts => {
                let lower = ask_valid(p, "Greater Than", parse_amount)?;
                let upper = ask_valid(p, "Less Than", parse_amount)?;
                self.conditions.set_amounts(lower, upper);
            }
            Group::RowLimit => {
                let limit = ask_valid(p, "How Many Rows do you want?", parse_row_limit)?;
                self.conditions.set_row_limit(limit);
            }
        }
        self.mark_set(group);
        Ok(())
    }
}

/// Drive the condition panel until the user leaves, handing each retrieval
/// to `retrieve`.
pub fn run_panel(
    p: &mut dyn Prompter,
    mut retrieve: impl FnMut(&Conditions) -> Result<()>,
) -> Result<()> {
    let mut panel = ConditionPanel::new();
    loop {
        p.say("Specify conditions for the data you want to view: ");
        p.say(&format!("Current Conditions are: {}", summary(panel.conditions())));
        p.say("Add Conditions of...");
        for line in PANEL_MENU {
            p.say(line);
        }
        let input = p.ask("Choice")?;
        match panel.step(&input, p)? {
            PanelAction::Continue => {}
            PanelAction::Retrieve { conditions, leave } => {
                retrieve(&conditions)?;
                if leave {
                    return Ok(());
                }
            }
            PanelAction::Leave => return Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Stats menu
// ---------------------------------------------------------------------------

pub const STATS_MENU: &[&str] = &["1. Summarize Purchase Pattern", "2. Return to main menu"];

/// Offer the canned statistics once; `summarize` receives the stats conditions.
pub fn run_stats(
    p: &mut dyn Prompter,
    mut summarize: impl FnMut(&Conditions) -> Result<()>,
) -> Result<()> {
    p.say("What do you want to do?");
    for line in STATS_MENU {
        p.say(line);
    }
    loop {
        match p.ask("Choice")?.trim() {
            "1" => return summarize(&Conditions::for_stats()),
            "2" => return Ok(()),
            _ => p.say("Not a Valid input. Try again."),
        }
    }
}
