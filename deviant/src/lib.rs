use deviant_codegen::codegen::Codegen;
use deviant_ir::Module;
use deviant_parser::parser::Parser;
use deviant_source::Source;

/// Compiles a translation unit into an IR [`Module`].
///
/// Sequences tokenize → parse → generate. Each stage runs to completion;
/// if a stage accumulated any diagnostics the pipeline stops and the
/// rendered diagnostics (with line:column positions) are returned instead.
pub fn compile(name: &str, source_text: &str) -> Result<Module, String> {
    let source = Source::new(source_text);

    let mut parser = Parser::new(&source);
    let program = parser.parse_program();
    if !source.has_no_errors() {
        return Err(source.render_errors());
    }

    let mut codegen = Codegen::new(name, &source);
    codegen.codegen_program(&program);
    if !source.has_no_errors() {
        return Err(source.render_errors());
    }

    Ok(codegen.into_module())
}
