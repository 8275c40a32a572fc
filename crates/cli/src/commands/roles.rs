//! `consilium roles` — List panel roles and their templates.

use consilium_core::role::Role;
use consilium_panel::PromptBuilder;

pub async fn run(show: Option<Role>) -> Result<(), Box<dyn std::error::Error>> {
    let builder = PromptBuilder::default();

    if let Some(role) = show {
        let template = builder
            .template(role)
            .ok_or_else(|| format!("No template registered for {role}"))?;
        println!("{} {role} template", role.icon());
        println!("{}", "=".repeat(40));
        println!("{template}");
        return Ok(());
    }

    println!("🩺 Panel Roles");
    println!("==============");
    println!();
    for role in builder.roles() {
        let kind = if role.is_specialist() { "specialist" } else { "synthesis" };
        let inputs = builder.placeholders(role)?.join(", ");
        println!("  {} {:<22} {:<10}  inputs: {inputs}", role.icon(), role.name(), kind);
    }
    println!();
    println!("  Show a template with: consilium roles --show <ROLE>");

    Ok(())
}
