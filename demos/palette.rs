//! A palette whose colors can be renamed or retired while widgets keep referring to them.
//!
//! Run with:
//! ```bash
//! cargo run --example palette -- --retire blue --rename red=crimson
//! ```

use clap::Parser;
use color_eyre::eyre::eyre;
use dynenum::domain::Domain;

#[derive(Parser)]
struct Cli {
    /// Colors to remove from the palette.
    #[arg(long)]
    retire: Vec<String>,

    /// Renames in the form `old=new`.
    #[arg(long)]
    rename: Vec<String>,

    /// Log verbosity.
    #[arg(long, default_value = "debug")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    simplelog::TermLogger::init(
        cli.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let palette: Domain<String> = ["red", "green", "blue", "black", "white"]
        .into_iter()
        .map(String::from)
        .collect();
    println!("palette = {:?}", palette.values());

    let widgets = [
        ("button", "red"),
        ("label", "black"),
        ("border", "blue"),
        ("background", "white"),
        ("link", "blue"),
    ];
    let mut bindings = Vec::new();
    for (widget, color) in widgets {
        let var = palette.variable(color)?;
        bindings.push((widget, var));
    }

    for name in &cli.retire {
        if !palette.remove(name) {
            log::warn!("'{}' is not in the palette", name);
        }
    }

    for rename in &cli.rename {
        let (old, new) = rename
            .split_once('=')
            .ok_or_else(|| eyre!("expected old=new, got '{}'", rename))?;
        if !palette.replace(old, new.to_string()) {
            log::warn!("'{}' is not in the palette", old);
        }
    }

    println!("palette = {:?}", palette.values());
    for (widget, var) in &bindings {
        match var.value() {
            Ok(color) => println!("{widget:>12} = {color}"),
            Err(e) => println!("{widget:>12} : {e}"),
        }
    }

    drop(bindings);
    palette.close()?;

    Ok(())
}
