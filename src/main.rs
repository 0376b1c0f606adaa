use bindpath::{BindingParser, MemberPath};
use std::env;

/// Parses binding strings from the command line and prints their canonical
/// form, source path segments and diagnostics.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Parses binding expressions and prints their canonical form.");
        eprintln!();
        eprintln!("Usage: bindpath <binding> [<binding>...]");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  bindpath \"Text Items[0].Name, Mode=TwoWay; Visible !IsHidden\"");
        std::process::exit(1);
    }

    let parser = BindingParser::default();
    let mut failed = false;
    for text in &args {
        let result = parser.parse(text);
        println!("{}", text);
        for binding in &result.bindings {
            println!("  {}", binding);
            if let Some(path) = binding.source_path() {
                println!("    path: {:?}", MemberPath::parse(&path).segments());
            }
        }
        for diagnostic in &result.diagnostics {
            println!("  error: {}", diagnostic);
        }
        failed |= !result.is_ok();
    }
    if failed {
        std::process::exit(2);
    }
}
