/// The rendering walker.
///
/// Implements `Context::render`, which mirrors the evaluator node for node
/// and produces Nim source instead of values.
pub mod core;

/// Nim spellings of types, literals and operators.
pub mod nim;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        config::Config,
        interpreter::{evaluator::core::Context, parser::core::parse_source},
    };

    fn context() -> Context {
        Context::with_io(Config::default(), Box::new(std::io::empty()), Box::new(std::io::sink()))
    }

    fn render(source: &str) -> String {
        let (program, _) = parse_source(source);
        context().render_program(&program.unwrap()).unwrap()
    }

    #[test]
    fn renders_declarations_and_output() {
        assert_eq!(render("var x = 1 + 2 * 3; print x"), "var x = 1 + (2 * 3)\necho x");
        assert_eq!(render("echo 'a' + name"), "echo \"a\" & name");
        assert_eq!(render("print 7 / 2"), "echo 7 div 2");
    }

    #[test]
    fn renders_functions_with_nim_types() {
        let expected = "proc add(a: int, b: auto): int =\n    return a + b";
        assert_eq!(render("func add(a: int, b) int { return a + b }"), expected);
        assert_eq!(render("func noop() { }"), "proc noop(): auto =\n    discard");
    }

    #[test]
    fn renders_conditionals_and_loops() {
        let expected = "if x == 1:\n    echo \"one\"\nelse:\n    echo \"other\"";
        assert_eq!(render("if x == 1 { print 'one' } else { print 'other' }"), expected);

        let expected = "while i < 3:\n    i = (i + 1)";
        assert_eq!(render("while i < 3 { i = (i + 1) }"), expected);

        let expected = "var ret: seq[string] = @[]\nwhile i < 3:\n    i = (i + 1)\n    ret.add($(i))";
        assert_eq!(render("while ret i < 3 { i = (i + 1); i }"), expected);
    }

    #[test]
    fn renders_match_and_try() {
        let expected = "case x\nof 1:\n    \"one\"\nelse:\n    discard";
        assert_eq!(render("match x with { 1: 'one' }"), expected);

        let expected = "try:\n    f()\nexcept ValueError:\n    echo \"bad\"";
        assert_eq!(render("try { f() } except ValueError { print 'bad' }"), expected);
    }

    #[test]
    fn renders_arrays_literals_and_comments() {
        assert_eq!(render("var xs = int -> [1, 2]"), "var xs = @[1, 2]");
        assert_eq!(render("var b = True; var n = None"), "var b = true\nvar n = nil");
        assert_eq!(render("|note|"), "# note");
    }

    #[test]
    fn compile_time_values_are_spliced() {
        let mut context = context();
        let (program, _) = parse_source("$ var width = 3; var area = $ width * 2");
        let text = context.render_program(&program.unwrap()).unwrap();
        assert_eq!(text, "var area = 6");
    }

    #[test]
    fn placeholders_render_nothing() {
        assert_eq!(render("alg x; @x; print 1"), "echo 1");
    }

    #[test]
    fn rendering_is_repeatable() {
        let (program, _) = parse_source("func f(n) { if n < 2 { return n }; return f(n - 1) }; print f(4)");
        let program = program.unwrap();
        let mut context = context();
        let first = context.render_program(&program).unwrap();
        let second = context.render_program(&program).unwrap();
        assert_eq!(first, second);
    }
}
