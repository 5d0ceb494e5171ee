//! Guide command handler

use mindmap_explorer::core::guide::guide_text;

/// Print the navigation guide
pub fn run() {
    println!("\n=== How to explore ===\n");
    print!("{}", guide_text());
}
