//! Example: Compare two XML documents
//!
//! Prints every difference found between two documents, one per line.
//!
//! Usage: cargo run --example compare <first.xml> <second.xml> [ignore-regex...]

use std::env;
use xml_cmp::{CompareOptions, XmlComparator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <first.xml> <second.xml> [ignore-regex...]", args[0]);
        std::process::exit(1);
    }

    let options = CompareOptions::default().with_ignore_patterns(args[3..].iter().cloned());
    let comparator = XmlComparator::new(options);

    eprintln!("Comparing {} with {}", args[1], args[2]);
    let recorder = comparator.compare_files(&args[1], &args[2])?;

    if recorder.is_empty() {
        eprintln!("Documents are equivalent");
    } else {
        for message in recorder.messages() {
            println!("{}", message);
        }
        eprintln!("\n{} difference(s) found", recorder.len());
    }

    Ok(())
}
