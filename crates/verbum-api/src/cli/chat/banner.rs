//! Welcome banner printed when a conversation starts.

use console::style;

pub fn print_welcome_banner(backend: &str, model: &str, session_id: &str, degraded: bool) {
    println!();
    println!("  {} {}", style("✝").bold(), style("Verbum").cyan().bold());
    println!("  {}", style("Ask about the Bible, the time, the date, or a sum.").dim());
    println!();
    println!("  {}  {}", style("Backend:").bold(), style(backend).dim());
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    if degraded {
        println!();
        println!(
            "  {} {}",
            style("!").yellow().bold(),
            style("Backend unavailable: Bible questions get a canned answer.").yellow()
        );
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
