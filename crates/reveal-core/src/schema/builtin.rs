//! Schemas shipped with Reveal.
//!
//! Kind names match the categories emitted by the language analyzers
//! (`function`, `class`, `method`, `heading`, ...).

use super::{EntityDef, RevealType, SchemaError};

/// All built-in schemas, in registration order.
pub fn all() -> Result<Vec<RevealType>, SchemaError> {
    Ok(vec![
        python()?,
        rust()?,
        javascript()?,
        typescript()?,
        go()?,
        java()?,
        markdown()?,
        toml()?,
        yaml()?,
    ])
}

fn callable() -> EntityDef {
    EntityDef::new()
        .contains(["function", "class", "variable"])
        .property("signature", "string")
        .property("complexity", "integer")
        .property("docstring", "string")
}

pub fn python() -> Result<RevealType, SchemaError> {
    RevealType::builder("python")
        .extensions([".py", ".pyi", ".pyw"])
        .scheme("python")
        .entity("module", EntityDef::new().contains(["class", "function", "import", "variable"]))
        .entity(
            "class",
            EntityDef::new()
                .contains(["class", "method", "function", "attribute"])
                .property("bases", "list")
                .property("decorators", "list"),
        )
        .entity("function", callable().property("decorators", "list"))
        .entity("method", EntityDef::new().inherits("function").property("is_static", "bool"))
        .entity("import", EntityDef::new().property("module", "string"))
        .entity("variable", EntityDef::new().property("annotation", "string"))
        .entity("attribute", EntityDef::new().inherits("variable"))
        .build()
}

pub fn rust() -> Result<RevealType, SchemaError> {
    RevealType::builder("rust")
        .extension(".rs")
        .scheme("rust")
        .entity(
            "module",
            EntityDef::new().contains([
                "module", "struct", "enum", "trait", "impl", "function", "const", "import",
            ]),
        )
        .entity(
            "struct",
            EntityDef::new()
                .contains(["field"])
                .property("derives", "list")
                .property("visibility", "string"),
        )
        .entity("enum", EntityDef::new().contains(["variant"]).inherits("struct"))
        .entity(
            "trait",
            EntityDef::new()
                .contains(["function", "const"])
                .property("visibility", "string"),
        )
        .entity(
            "impl",
            EntityDef::new()
                .contains(["method", "function", "const"])
                .property("target", "string")
                .property("trait", "string"),
        )
        .entity("function", callable().property("is_async", "bool"))
        .entity("method", EntityDef::new().inherits("function").property("receiver", "string"))
        .entity("field", EntityDef::new().property("type", "string"))
        .entity("variant", EntityDef::new())
        .entity("const", EntityDef::new().property("type", "string"))
        .entity("import", EntityDef::new().property("path", "string"))
        .build()
}

fn ecmascript(name: &str, extensions: &[&str]) -> Result<RevealType, SchemaError> {
    RevealType::builder(name)
        .extensions(extensions.iter().copied())
        .scheme(name)
        .entity("module", EntityDef::new().contains(["class", "function", "import", "variable"]))
        .entity(
            "class",
            EntityDef::new()
                .contains(["method", "property"])
                .property("extends", "string"),
        )
        .entity("function", callable().property("is_async", "bool"))
        .entity("arrow_function", EntityDef::new().inherits("function"))
        .entity("method", EntityDef::new().inherits("function").property("is_static", "bool"))
        .entity("property", EntityDef::new())
        .entity("import", EntityDef::new().property("source", "string"))
        .entity("variable", EntityDef::new().contains(["arrow_function"]))
        .build()
}

pub fn javascript() -> Result<RevealType, SchemaError> {
    ecmascript("javascript", &[".js", ".jsx", ".mjs", ".cjs"])
}

pub fn typescript() -> Result<RevealType, SchemaError> {
    ecmascript("typescript", &[".ts", ".tsx", ".mts", ".cts"])
}

pub fn go() -> Result<RevealType, SchemaError> {
    RevealType::builder("go")
        .extension(".go")
        .scheme("go")
        .entity("struct", EntityDef::new().contains(["field"]))
        .entity("interface", EntityDef::new().contains(["method"]))
        .entity("function", callable())
        .entity("method", EntityDef::new().inherits("function").property("receiver", "string"))
        .entity("field", EntityDef::new().property("type", "string"))
        .entity("import", EntityDef::new().property("path", "string"))
        .build()
}

pub fn java() -> Result<RevealType, SchemaError> {
    RevealType::builder("java")
        .extension(".java")
        .scheme("java")
        .entity(
            "class",
            EntityDef::new()
                .contains(["class", "interface", "enum", "method", "field", "constructor"])
                .property("extends", "string")
                .property("annotations", "list"),
        )
        .entity("interface", EntityDef::new().inherits("class"))
        .entity("enum", EntityDef::new().contains(["constant"]).inherits("class"))
        .entity("method", callable().property("annotations", "list"))
        .entity("constructor", EntityDef::new().inherits("method"))
        .entity("field", EntityDef::new().property("type", "string"))
        .entity("constant", EntityDef::new())
        .entity("import", EntityDef::new().property("path", "string"))
        .build()
}

pub fn markdown() -> Result<RevealType, SchemaError> {
    RevealType::builder("markdown")
        .extensions([".md", ".markdown"])
        .scheme("markdown")
        .entity(
            "section",
            EntityDef::new()
                .contains(["section", "heading", "code_block", "list", "link"])
                .property("level", "integer"),
        )
        .entity("heading", EntityDef::new().inherits("section"))
        .entity("code_block", EntityDef::new().property("language", "string"))
        .entity("list", EntityDef::new().property("ordered", "bool"))
        .entity("link", EntityDef::new().property("url", "string"))
        .build()
}

fn config_format(name: &str, extensions: &[&str]) -> Result<RevealType, SchemaError> {
    RevealType::builder(name)
        .extensions(extensions.iter().copied())
        .scheme(name)
        .entity("section", EntityDef::new().contains(["section", "key"]))
        .entity("key", EntityDef::new().property("value_type", "string"))
        .build()
}

pub fn toml() -> Result<RevealType, SchemaError> {
    config_format("toml", &[".toml"])
}

pub fn yaml() -> Result<RevealType, SchemaError> {
    config_format("yaml", &[".yaml", ".yml"])
}
