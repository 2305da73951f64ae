use std::path::PathBuf;

use crate::cli::open_db;
use crate::error::Result;
use crate::settings::{expand_path, load_settings, save_settings};

pub fn run(data_dir: Option<String>, mailbox_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = expand_path(&dir);
        if mailbox_dir.is_none() {
            settings.mailbox_dir = PathBuf::from(&settings.data_dir)
                .join("mail")
                .to_string_lossy()
                .to_string();
        }
    }
    if let Some(dir) = mailbox_dir {
        settings.mailbox_dir = expand_path(&dir);
    }

    save_settings(&settings)?;

    let data_dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(data_dir.join("exports"))?;
    std::fs::create_dir_all(&settings.mailbox_dir)?;
    open_db(&settings)?;

    println!("Initialized basket at {}", data_dir.display());
    println!("Mailbox:  {}", settings.mailbox_dir);
    Ok(())
}
