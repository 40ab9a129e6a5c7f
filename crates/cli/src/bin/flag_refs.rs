use anyhow::Result;

fn main() -> Result<()> {
    flagrefs_cli::main_entry()
}
