use nim_ir::NimOutputter;

use crate::cast::TranslationUnit;
use crate::config::Config;
use crate::context::BindContext;
use crate::error::Result;
use crate::passes;

/// Runs the whole pipeline for one translation unit: bind every declaration in discovery
/// order, apply the configured renames, render.
///
/// Fail-fast: the first fatal condition aborts the run and nothing is returned; writing the
/// result anywhere is the caller's business and only ever happens with a complete module.
pub fn generate(tu: &TranslationUnit, config: &Config) -> Result<String> {
    let mut ctx = BindContext::new(config);
    for id in tu.decl_ids() {
        passes::bind::bind_decl(&mut ctx, tu, id)?;
    }

    let mut module = ctx.into_module();
    if let Some(prefix) = config.strip_prefix() {
        passes::rename::strip_prefix(&mut module, prefix);
    }

    let mut output = String::new();
    NimOutputter::new(&mut output)
        .write_module(&module)
        .expect("writing to a String can't fail");
    Ok(output)
}
