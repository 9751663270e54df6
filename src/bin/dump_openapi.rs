use std::fs;

use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let doc = crm_core::docs::ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&doc)?;
    let path = "/tmp/crm-core-openapi.json";
    fs::write(path, json)?;
    println!("wrote {}", path);
    Ok(())
}
