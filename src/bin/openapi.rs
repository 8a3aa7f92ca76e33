//! Prints the OpenAPI document so CI can publish it without booting the
//! service.

use anyhow::Result;

fn main() -> Result<()> {
    let doc = dashgate::dashgate::openapi();
    println!("{}", doc.to_pretty_json()?);
    Ok(())
}
