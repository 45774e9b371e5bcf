use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs is self-contained (clap + clap_complete only, both listed as
// build-dependencies), so it compiles here without the rest of the crate.
#[path = "src/cli.rs"]
mod cli;

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR not set by Cargo");
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");

    // Walk the command tree; subcommand pages take dash-joined names
    // (`restdeck-config-init.1`). Hidden commands get no page.
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();
        for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
            pending.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
        }
        write_man_page(cmd, &man_dir);
    }
}

fn write_man_page(cmd: clap::Command, dir: &Path) {
    let path = dir.join(format!("{}.1", cmd.get_name()));

    let mut page = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut page)
        .unwrap_or_else(|err| panic!("failed to render {}: {err}", path.display()));
    fs::write(&path, page)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", path.display()));
}
