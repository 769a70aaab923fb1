//! Rename passes over a finished module.
//!
//! Syms carry their full name history, so a rename here never loses the original spelling and
//! the import patterns (plain strings) are untouched.

use nim_ir::Module;

/// Strips `prefix` from every sym whose name starts with it.
///
/// `lib_create_window` with prefix `lib_` comes out as `create_window`; a name that is nothing
/// but the prefix is left alone.
pub fn strip_prefix(module: &mut Module, prefix: &str) {
    let ids: Vec<_> = module.sym_ids().collect();
    for id in ids {
        let stripped = match module.sym(id).name().strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => rest.to_owned(),
            _ => continue,
        };
        module.sym_mut(id).update(stripped);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_matching_prefixes_only() {
        let mut module = Module::new();
        let a = module.new_sym("sdl_init");
        let b = module.new_sym("quit");
        let c = module.new_sym("sdl_");

        strip_prefix(&mut module, "sdl_");

        assert_eq!(module.sym(a).name(), "init");
        assert_eq!(module.sym(a).original_name(), "sdl_init");
        assert_eq!(module.sym(b).name(), "quit");
        assert_eq!(module.sym(c).name(), "sdl_");
    }
}
