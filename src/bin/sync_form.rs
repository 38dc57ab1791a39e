use dialoguer::{Confirm, Input, Password, Select};
use sales_sync::utils::logger;
use sales_sync::{Engine, Settings, SyncForm};
use std::time::Duration;

/// Prints panel lines the terminal has not shown yet.
fn flush_panel(form: &SyncForm, shown: &mut usize) {
    let lines = form.panel().lines();
    for line in &lines[*shown..] {
        println!("{}", line);
    }
    *shown = lines.len();
}

fn edit_fields(form: &mut SyncForm) -> Result<(), dialoguer::Error> {
    let labels: Vec<String> = Engine::ALL.iter().map(|e| e.to_string()).collect();
    let current = Engine::ALL
        .iter()
        .position(|e| *e == form.fields.engine)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Database")
        .items(&labels)
        .default(current)
        .interact()?;
    if Engine::ALL[choice] != form.fields.engine {
        form.select_engine(Engine::ALL[choice]);
    }

    form.fields.host = Input::new()
        .with_prompt("Host")
        .with_initial_text(form.fields.host.clone())
        .interact_text()?;
    form.fields.user = Input::new()
        .with_prompt("User")
        .with_initial_text(form.fields.user.clone())
        .interact_text()?;
    let password = Password::new()
        .with_prompt("Password (empty keeps current)")
        .allow_empty_password(true)
        .interact()?;
    if !password.is_empty() {
        form.fields.password = password;
    }
    form.fields.database = Input::new()
        .with_prompt("Database name")
        .with_initial_text(form.fields.database.clone())
        .interact_text()?;

    form.fields.supabase_url = Input::new()
        .with_prompt("Supabase URL")
        .with_initial_text(form.fields.supabase_url.clone())
        .allow_empty(true)
        .interact_text()?;
    let key = Password::new()
        .with_prompt("Supabase key (empty keeps current)")
        .allow_empty_password(true)
        .interact()?;
    if !key.is_empty() {
        form.fields.supabase_key = key;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_form_logger();

    let mut form = SyncForm::new(Settings::from_env());
    let mut shown = 0;

    loop {
        edit_fields(&mut form)?;

        if !Confirm::new()
            .with_prompt("Run sync now?")
            .default(true)
            .interact()?
        {
            break;
        }

        if form.submit() {
            while !form.pump() {
                flush_panel(&form, &mut shown);
                std::thread::sleep(Duration::from_millis(100));
            }
        }
        flush_panel(&form, &mut shown);

        if !Confirm::new()
            .with_prompt("Run again?")
            .default(false)
            .interact()?
        {
            break;
        }
    }

    Ok(())
}
