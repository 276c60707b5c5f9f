use deno_ast::{EmitOptions, MediaType, ParseParams, TranspileModuleOptions, TranspileOptions};
use std::env;
use std::fs;
use std::path::Path;

/// Transpile TypeScript to JavaScript using deno_ast
fn transpile_ts(ts_code: &str, specifier: &str) -> String {
    let parsed = deno_ast::parse_module(ParseParams {
        specifier: deno_ast::ModuleSpecifier::parse(specifier).unwrap(),
        text: ts_code.into(),
        media_type: MediaType::TypeScript,
        capture_tokens: false,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .expect("Failed to parse TypeScript");

    let transpile_result = parsed
        .transpile(
            &TranspileOptions::default(),
            &TranspileModuleOptions::default(),
            &EmitOptions::default(),
        )
        .expect("Failed to transpile TypeScript");

    transpile_result.into_source().text
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    println!("cargo:rerun-if-changed=ts/init.ts");

    let ts_code = fs::read_to_string("ts/init.ts").expect("Failed to read ts/init.ts");
    let js_code = transpile_ts(&ts_code, "file:///init.ts");

    let extension_rs = format!(
        r#"deno_core::extension!(
    runtime_text_encoding,
    ops = [
        op_text_encoding_is_valid,
        op_encode_text,
        op_text_encodings,
    ],
    esm_entry_point = "ext:runtime_text_encoding/init.js",
    esm = ["ext:runtime_text_encoding/init.js" = {{ source = {:?} }}]
);"#,
        js_code
    );

    fs::write(out_path.join("extension.rs"), extension_rs).expect("Failed to write extension.rs");
}
