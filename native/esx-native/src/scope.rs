use oxc_ast::ast::*;
use oxc_ast_visit::Visit;
use std::collections::HashSet;

/// Collects every binding and every referenced name in a unit. Minted
/// reference names must not collide with any of them.
pub struct NameCollector {
    pub names: HashSet<String>,
}

impl<'a> Visit<'a> for NameCollector {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.insert(ident.name.to_string());
    }
}

pub struct BindingCollector<'s> {
    pub symbols: &'s mut HashSet<String>,
}

impl<'s, 'a> Visit<'a> for BindingCollector<'s> {
    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.symbols.insert(ident.name.to_string());
    }
}

/// `var` declarations anywhere outside a function body. They hoist to the
/// program scope even when written inside `if`, loops, `try` or blocks.
pub struct HoistedVarCollector<'s> {
    pub symbols: &'s mut HashSet<String>,
}

impl<'s, 'a> Visit<'a> for HoistedVarCollector<'s> {
    fn visit_variable_declaration(&mut self, decl: &VariableDeclaration<'a>) {
        if decl.kind == VariableDeclarationKind::Var {
            collect_variable_bindings(decl, self.symbols);
        }
    }

    fn visit_function_body(&mut self, _body: &FunctionBody<'a>) {}

    fn visit_static_block(&mut self, _block: &StaticBlock<'a>) {}
}

pub fn collect_unit_names(program: &Program<'_>) -> HashSet<String> {
    let mut collector = NameCollector {
        names: HashSet::new(),
    };
    collector.visit_program(program);
    collector.names
}

/// Names bound in the program scope: imports, top-level variable, function
/// and class declarations (exported or not), and hoisted `var`s.
pub fn collect_top_level_bindings(program: &Program<'_>) -> HashSet<String> {
    let mut symbols = HashSet::new();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(import_decl) => {
                if let Some(specifiers) = &import_decl.specifiers {
                    for specifier in specifiers {
                        match specifier {
                            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                                symbols.insert(s.local.name.to_string());
                            }
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                                symbols.insert(s.local.name.to_string());
                            }
                            ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                                symbols.insert(s.local.name.to_string());
                            }
                        }
                    }
                }
            }
            Statement::VariableDeclaration(decl) => {
                collect_variable_bindings(decl, &mut symbols);
            }
            Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    symbols.insert(id.name.to_string());
                }
            }
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    symbols.insert(id.name.to_string());
                }
            }
            Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(Declaration::VariableDeclaration(decl)) => {
                    collect_variable_bindings(decl, &mut symbols);
                }
                Some(Declaration::FunctionDeclaration(func)) => {
                    if let Some(id) = &func.id {
                        symbols.insert(id.name.to_string());
                    }
                }
                Some(Declaration::ClassDeclaration(class)) => {
                    if let Some(id) = &class.id {
                        symbols.insert(id.name.to_string());
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }

    HoistedVarCollector {
        symbols: &mut symbols,
    }
    .visit_program(program);

    symbols
}

fn collect_variable_bindings(decl: &VariableDeclaration<'_>, symbols: &mut HashSet<String>) {
    let mut collector = BindingCollector { symbols };
    for declarator in &decl.declarations {
        collector.visit_binding_pattern(&declarator.id);
    }
}
