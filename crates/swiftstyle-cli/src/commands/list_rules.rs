//! List rules command implementation.

use swiftstyle_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  minimal      - SW001, SW007 (for gradual adoption)");
    println!("  recommended  - SW001-SW008 (default)");
    println!("  strict       - All rules, no-force-unwrap enforced in tests too");
    println!("  all          - All rules with default settings");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  swiftstyle lint --rules type-casing,no-force-unwrap");
    println!("  swiftstyle lint --rules SW001,SW007");
}
