
use crate::decl::{
    ConstructorDecl, EnumDecl, FuncDecl, MethodDecl, Param, RecordDecl, RoutineDecl, TypeDecl,
    VariableDecl,
};
use crate::expr::Expr;
use crate::ident;
use crate::sym::SymId;
use crate::ty::{GenericArg, Type, TypeId};
use crate::Module;
use std::fmt::Result;

/// The runtime-support module every generated file imports. It provides the marker types
/// (`CConst`, `CUnsizedArray`, the extended numeric atoms) the rendered types refer to.
pub const PRELUDE_MODULE: &str = "bindbase";

/// Suffix of the internal proc in the template-forwarding pair.
const FORWARD_SUFFIX: &str = "Impl";

#[derive(Debug, Clone, Default)]
pub struct NimOutputConfig {
    /// If `true`, the fixed `import bindbase` prelude is not emitted. Only useful for tests that
    /// look at single declarations.
    pub omit_prelude: bool,
}

/// Can be used to format finished [`Module`]s to a writer.
///
/// A mutable reference to the writer---an implementor of [`std::fmt::Write`]---must be passed to
/// [`new`]. Then [`Module`]s can be formatted using [`write_module`].
///
/// Rendering is pure text generation: the same module always produces the same text, and nothing
/// is written until the whole IR forest is complete.
///
/// [`new`]: NimOutputter::new
/// [`write_module`]: NimOutputter::write_module
pub struct NimOutputter<'w, W: std::fmt::Write> {
    writer: &'w mut W,
    config: NimOutputConfig,
}

impl<'w, W: std::fmt::Write> NimOutputter<'w, W> {
    pub fn new(writer: &'w mut W) -> Self {
        Self {
            writer,
            config: Default::default(),
        }
    }

    pub fn with_config(self, config: NimOutputConfig) -> Self {
        Self { config, ..self }
    }

    /// Writes the whole module: prelude import, type section, proc declarations, var
    /// declarations, in that order.
    pub fn write_module(&mut self, value: &Module) -> Result {
        if !self.config.omit_prelude {
            writeln!(self.writer, "import {PRELUDE_MODULE}")?;
        }

        if !value.type_decls().is_empty() {
            self.writer.write_str("\ntype\n")?;
            for decl in value.type_decls() {
                self.write_type_decl(value, decl)?;
            }
        }

        if !value.routine_decls().is_empty() {
            self.writer.write_char('\n')?;
            for decl in value.routine_decls() {
                self.write_routine_decl(value, decl)?;
            }
        }

        if !value.var_decls().is_empty() {
            self.writer.write_char('\n')?;
            for decl in value.var_decls() {
                self.write_var_decl(value, decl)?;
            }
        }
        Ok(())
    }

    pub fn write_type_decl(&mut self, module: &Module, value: &TypeDecl) -> Result {
        match value {
            TypeDecl::Alias(alias) => {
                writeln!(
                    self.writer,
                    "  {}* = {}",
                    self.name_of(module, alias.name),
                    self.type_text(module, alias.ty)
                )
            }
            TypeDecl::Enum(decl) => self.write_enum_decl(module, decl),
            TypeDecl::Record(decl) => self.write_record_decl(module, decl),
        }
    }

    fn write_enum_decl(&mut self, module: &Module, value: &EnumDecl) -> Result {
        writeln!(
            self.writer,
            "  {}* {} = enum",
            self.name_of(module, value.name),
            import_pragma(&value.cpp_name, &value.header, &[])
        )?;
        for field in &value.fields {
            match field.value {
                Some(v) => writeln!(self.writer, "    {} = {v}", self.name_of(module, field.name))?,
                None => writeln!(self.writer, "    {}", self.name_of(module, field.name))?,
            }
        }
        Ok(())
    }

    fn write_record_decl(&mut self, module: &Module, value: &RecordDecl) -> Result {
        let name = self.name_of(module, value.name);
        let mut pattern = value.cpp_name.clone();
        let generics = match &value.generic_params {
            Some(params) => {
                // Type-position back-references count generic params from zero.
                let refs: Vec<String> = (0..params.len()).map(|i| format!("'{i}")).collect();
                pattern.push_str(&format!("<{}>", refs.join(", ")));
                format!("[{}]", self.name_list(module, params))
            }
            None => String::new(),
        };
        writeln!(
            self.writer,
            "  {name}*{generics} {} = object",
            import_pragma(&pattern, &value.header, &[])
        )?;
        if let Some(fields) = &value.fields {
            for field in fields {
                writeln!(
                    self.writer,
                    "    {}*: {}",
                    self.name_of(module, field.name),
                    self.type_text(module, field.ty)
                )?;
            }
        }
        Ok(())
    }

    pub fn write_routine_decl(&mut self, module: &Module, value: &RoutineDecl) -> Result {
        let generics = value.all_generic_params();
        if generics.is_empty() {
            self.write_plain_routine(module, value)
        } else {
            self.write_forwarded_routine(module, value, &generics)
        }
    }

    fn write_plain_routine(&mut self, module: &Module, value: &RoutineDecl) -> Result {
        let sig = self.routine_signature(module, value, &[]);
        let pattern = routine_pattern(value, sig.natural_count, 0);
        writeln!(
            self.writer,
            "proc {}*({}){} {}",
            sig.proc_name,
            sig.param_text,
            sig.ret_text,
            import_pragma(&pattern, routine_header(value), sig.extra_pragmas)
        )
    }

    /// The two-proc forwarding idiom for routines that carry template parameters.
    ///
    /// The import-pattern syntax can only reference concrete parameters, never generic ones, so
    /// the internal proc reifies every template parameter as a trailing `typedesc` parameter and
    /// the pattern refers to them as `'N` back-references counted from the natural parameter
    /// count onward. The exported proc has the natural signature and forwards, passing the
    /// template parameters positionally.
    fn write_forwarded_routine(
        &mut self,
        module: &Module,
        value: &RoutineDecl,
        generics: &[SymId],
    ) -> Result {
        let sig = self.routine_signature(module, value, generics);
        let generic_text = self.name_list(module, generics);

        // Internal proc: natural params plus one typedesc per template parameter.
        let mut internal_params = sig.param_text.clone();
        for (i, g) in generics.iter().enumerate() {
            if !internal_params.is_empty() {
                internal_params.push_str(", ");
            }
            internal_params.push_str(&format!("t{i}: typedesc[{}]", self.name_of(module, *g)));
        }
        let pattern = routine_pattern(value, sig.natural_count, generics.len());
        writeln!(
            self.writer,
            "proc {}{FORWARD_SUFFIX}[{generic_text}]({internal_params}){} {}",
            sig.proc_name,
            sig.ret_text,
            import_pragma(&pattern, routine_header(value), sig.extra_pragmas)
        )?;

        // Public forwarder with the natural signature.
        let mut call_args: Vec<String> = Vec::with_capacity(sig.natural_count + generics.len());
        if sig.has_this {
            call_args.push("this".to_owned());
        }
        for (i, p) in sig.decl_params.iter().enumerate() {
            call_args.push(self.param_name(module, p, i));
        }
        for g in generics {
            call_args.push(self.name_of(module, *g));
        }
        writeln!(
            self.writer,
            "proc {}*[{generic_text}]({}){} = {}{FORWARD_SUFFIX}({})",
            sig.proc_name,
            sig.param_text,
            sig.ret_text,
            sig.proc_name,
            call_args.join(", ")
        )
    }

    pub fn write_var_decl(&mut self, module: &Module, value: &VariableDecl) -> Result {
        writeln!(
            self.writer,
            "var {}* {}: {}",
            self.name_of(module, value.name),
            import_pragma(&value.cpp_name, &value.header, &[]),
            self.type_text(module, value.ty)
        )
    }

    fn routine_signature<'a>(
        &self,
        module: &Module,
        value: &'a RoutineDecl,
        generics: &[SymId],
    ) -> Signature<'a> {
        match value {
            RoutineDecl::Func(FuncDecl {
                name, params, ret, ..
            }) => Signature {
                proc_name: self.name_of(module, *name),
                natural_count: params.len(),
                decl_params: params.clone(),
                has_this: false,
                param_text: self.params_text(module, params, None),
                ret_text: self.ret_text(module, *ret),
                extra_pragmas: &[],
            },
            RoutineDecl::Constructor(ConstructorDecl { owner, params, .. }) => {
                let owner_text = self.owner_text(module, *owner, generics, value);
                Signature {
                    proc_name: format!("new{}", self.owner_name(module, *owner)),
                    natural_count: params.len(),
                    decl_params: params.clone(),
                    has_this: false,
                    param_text: self.params_text(module, params, None),
                    ret_text: format!(": {owner_text}"),
                    extra_pragmas: &["constructor"],
                }
            }
            RoutineDecl::Method(MethodDecl {
                name,
                is_static,
                owner,
                params,
                ret,
                ..
            }) => {
                let this = if *is_static {
                    None
                } else {
                    Some(self.owner_text(module, *owner, generics, value))
                };
                // The self parameter takes part in positional pattern counting.
                let natural_count = params.len() + usize::from(!*is_static);
                Signature {
                    proc_name: self.name_of(module, *name),
                    natural_count,
                    decl_params: params.clone(),
                    has_this: !*is_static,
                    param_text: self.params_text(module, params, this),
                    ret_text: self.ret_text(module, *ret),
                    extra_pragmas: &[],
                }
            }
        }
    }

    /// The owner type as it appears in signatures: generic owners get their parameters applied.
    fn owner_text(
        &self,
        module: &Module,
        owner: TypeId,
        generics: &[SymId],
        value: &RoutineDecl,
    ) -> String {
        let owner_generics = match value {
            RoutineDecl::Func(_) => &[],
            RoutineDecl::Constructor(c) => c.owner_generic_params.as_slice(),
            RoutineDecl::Method(m) => m.owner_generic_params.as_slice(),
        };
        let base = self.type_text(module, owner);
        if owner_generics.is_empty() {
            base
        } else {
            debug_assert!(owner_generics.len() <= generics.len());
            format!("{base}[{}]", self.name_list(module, owner_generics))
        }
    }

    fn owner_name(&self, module: &Module, owner: TypeId) -> String {
        match module.ty(owner) {
            Type::Atom(sym) => self.name_of(module, *sym),
            other => panic!("constructor owner should be an atom, got {other:?}"),
        }
    }

    fn params_text(&self, module: &Module, params: &[Param], this: Option<String>) -> String {
        let mut parts = Vec::with_capacity(params.len() + 1);
        if let Some(this_ty) = this {
            parts.push(format!("this: {this_ty}"));
        }
        for (i, param) in params.iter().enumerate() {
            parts.push(format!(
                "{}: {}",
                self.param_name(module, param, i),
                self.type_text(module, param.ty)
            ));
        }
        parts.join(", ")
    }

    fn param_name(&self, module: &Module, param: &Param, index: usize) -> String {
        match param.name {
            Some(sym) => self.name_of(module, sym),
            None => format!("a{index}"),
        }
    }

    fn ret_text(&self, module: &Module, ret: Option<TypeId>) -> String {
        match ret {
            Some(ty) => format!(": {}", self.type_text(module, ty)),
            None => String::new(),
        }
    }

    fn name_of(&self, module: &Module, sym: SymId) -> String {
        ident::render(&ident::fold_qualified(module.sym(sym).name()))
    }

    fn name_list(&self, module: &Module, syms: &[SymId]) -> String {
        syms.iter()
            .map(|s| self.name_of(module, *s))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn type_text(&self, module: &Module, ty: TypeId) -> String {
        match module.ty(ty) {
            Type::Atom(sym) => self.name_of(module, *sym),
            Type::Ptr(inner) => format!("ptr {}", self.type_text(module, *inner)),
            Type::Ref(inner) => format!("var {}", self.type_text(module, *inner)),
            Type::Opaque => "object".to_owned(),
            Type::Inst { name, args } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|arg| match arg {
                        GenericArg::Type(t) => self.type_text(module, *t),
                        GenericArg::Value(e) => self.expr_text(module, e),
                    })
                    .collect();
                format!("{}[{}]", self.name_of(module, *name), args.join(", "))
            }
            Type::UnsizedArray(inner) => {
                format!("CUnsizedArray[{}]", self.type_text(module, *inner))
            }
            Type::Array { len, elem } => format!(
                "array[{}, {}]",
                self.expr_text(module, len),
                self.type_text(module, *elem)
            ),
            Type::Func { params, ret } => {
                let params: Vec<String> = params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| format!("a{i}: {}", self.type_text(module, *p)))
                    .collect();
                let ret = match ret {
                    Some(r) => format!(": {}", self.type_text(module, *r)),
                    None => String::new(),
                };
                format!("proc ({}){ret} {{.cdecl.}}", params.join(", "))
            }
            Type::Const(inner) => format!("CConst[{}]", self.type_text(module, *inner)),
        }
    }

    fn expr_text(&self, module: &Module, expr: &Expr) -> String {
        match expr {
            Expr::Int(v) => v.to_string(),
            Expr::UInt(v) => v.to_string(),
            Expr::Param(sym) => self.name_of(module, *sym),
        }
    }
}

struct Signature<'a> {
    proc_name: String,
    /// How many parameters take part in positional pattern counting, including the self
    /// parameter of instance methods.
    natural_count: usize,
    /// The declared parameters, without the self parameter.
    decl_params: Vec<Param>,
    has_this: bool,
    param_text: String,
    ret_text: String,
    extra_pragmas: &'a [&'a str],
}

fn import_pragma(pattern: &str, header: &str, extra: &[&str]) -> String {
    let mut pragma = format!("{{.importcpp: \"{pattern}\", header: \"{header}\"");
    for e in extra {
        pragma.push_str(", ");
        pragma.push_str(e);
    }
    pragma.push_str(".}");
    pragma
}

fn routine_header(value: &RoutineDecl) -> &str {
    match value {
        RoutineDecl::Func(f) => &f.header,
        RoutineDecl::Constructor(c) => &c.header,
        RoutineDecl::Method(m) => &m.header,
    }
}

/// Builds the importcpp pattern of a routine.
///
/// Without template parameters the whole argument list is forwarded with `@`. With template
/// parameters each natural argument is passed with its own `#` (the trailing typedesc arguments
/// must not reach the C++ call) and the template argument list is spliced in as `'N`
/// back-references: the first typedesc parameter sits after the `n` natural parameters, so it is
/// `'n+1`, the next `'n+2`, and so on.
fn routine_pattern(value: &RoutineDecl, natural_count: usize, generic_count: usize) -> String {
    let n = natural_count;
    let template_args = if generic_count == 0 {
        String::new()
    } else {
        let refs: Vec<String> = (0..generic_count).map(|i| format!("'{}", n + 1 + i)).collect();
        format!("<{}>", refs.join(", "))
    };

    let (callee, call_params) = match value {
        RoutineDecl::Func(f) => (f.cpp_name.clone(), n),
        RoutineDecl::Constructor(c) => (c.cpp_name.clone(), n),
        RoutineDecl::Method(m) => {
            if m.is_static {
                (m.cpp_name.clone(), n)
            } else {
                // The first `#` consumes the self argument; the method name is unqualified.
                let plain = m.cpp_name.rsplit("::").next().unwrap_or(&m.cpp_name);
                (format!("#.{plain}"), n - 1)
            }
        }
    };

    let args = if generic_count == 0 {
        "@".to_owned()
    } else {
        vec!["#"; call_params].join(", ")
    };
    format!("{callee}{template_args}({args})")
}
