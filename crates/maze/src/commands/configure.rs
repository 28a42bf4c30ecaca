use colored::Colorize;
use maze_config::{Profile, ProfileStore};
use std::io::{BufRead, Write};

const DEFAULT_PROFILE: &str = "default";

pub fn handle(list: bool, delete: bool) -> anyhow::Result<()> {
    let store = ProfileStore::open_default()?;
    tracing::debug!("Profile document: {}", store.path().display());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    if list {
        list_profiles(&store, &mut output)
    } else if delete {
        delete_profile(&store, &mut input, &mut output)
    } else {
        add_profile(&store, &mut input, &mut output)
    }
}

pub fn list_profiles<W: Write>(store: &ProfileStore, output: &mut W) -> anyhow::Result<()> {
    let profiles = store.list()?;
    writeln!(output, "{}", "Profile list:".bold())?;
    for name in profiles.keys() {
        writeln!(output, " - {}", name)?;
    }
    Ok(())
}

pub fn add_profile<R, W>(store: &ProfileStore, input: &mut R, output: &mut W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let name = prompt(input, output, "Enter profile name (press enter for default):")?;
    let name = if name.is_empty() {
        DEFAULT_PROFILE.to_string()
    } else {
        name
    };

    let token = loop {
        let token = prompt(input, output, "Enter your authentication token:")?;
        if !token.is_empty() {
            break token;
        }
        writeln!(output, "{}", "Token cannot be empty".red())?;
    };

    store.save(&Profile::new(&name, token))?;
    writeln!(
        output,
        "{}",
        format!("Profile data successfully saved for profile {}", name).green()
    )?;
    Ok(())
}

pub fn delete_profile<R, W>(store: &ProfileStore, input: &mut R, output: &mut W) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write,
{
    let name = prompt(input, output, "Type a profile to delete:")?;
    if name.is_empty() {
        writeln!(output, "Exiting, no profiles deleted")?;
        return Ok(());
    }

    store.delete(&name)?;
    writeln!(
        output,
        "{}",
        format!("Profile {} successfully deleted", name).green()
    )?;
    Ok(())
}

/// Print `message`, then read one trimmed line. End of input is an error.
fn prompt<R, W>(input: &mut R, output: &mut W, message: &str) -> anyhow::Result<String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{} ", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("input closed before an answer was given");
    }
    Ok(line.trim().to_string())
}
