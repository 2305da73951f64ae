use rusqlite::Connection;

use crate::cli::prompt::TermPrompter;
use crate::cli::{open_db, stats, sync, view};
use crate::db::load_cursor;
use crate::error::Result;
use crate::panel::{ask_yes_no, Prompter};
use crate::settings::{load_settings, Settings};

const MAIN_MENU: &[&str] = &["1: View Order Records", "2: Get Stats", "3: Quit"];

/// `basket` with no subcommand: offer a sync, then the main menu.
pub fn run() -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;
    session(&settings, &conn, &mut TermPrompter)
}

pub fn session(settings: &Settings, conn: &Connection, p: &mut dyn Prompter) -> Result<()> {
    let cursor = load_cursor(conn)?;
    p.say(&format!("Your last update is on {cursor}"));
    if let Some(since) = cursor.date().and_hms_opt(0, 0, 0) {
        let hours = (chrono::Local::now().naive_local() - since).num_hours();
        if hours > 0 {
            p.say(&format!("You have not updated your database for {hours} hours"));
        }
    }

    if ask_yes_no(p, "Do you want to update your database? yes/no")? {
        match sync::perform(settings, conn, false) {
            Ok(report) => sync::print_report(&report, false),
            Err(e) => p.say(&format!("Update failed: {e}")),
        }
    } else {
        p.say(&format!("Not Updating Database. Latest Update is {cursor}"));
    }

    loop {
        p.say("Choose Options: ");
        for line in MAIN_MENU {
            p.say(line);
        }
        match p.ask("Choice")?.trim() {
            "1" => view::interactive(conn, p)?,
            "2" => stats::interactive(conn, p)?,
            "3" => {
                p.say("Bye bye");
                return Ok(());
            }
            _ => p.say("Not a valid choice"),
        }
    }
}
