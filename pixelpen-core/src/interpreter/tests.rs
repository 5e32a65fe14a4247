use super::*;
use crate::ast::Expr;
use crate::parser::parse;
use crate::scanner::tokenize;

/// Run a source program against a fresh 32x32 canvas.
fn run_source(source: &str) -> (Canvas, Diagnostics) {
    let mut canvas = Canvas::new(32, 32);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    assert!(
        diags.is_empty(),
        "unexpected parse diagnostics: {:?}",
        diags.entries()
    );
    execute(&instructions, &mut canvas, &mut diags);
    (canvas, diags)
}

fn runtime_kinds(diags: &Diagnostics) -> Vec<ErrorKind> {
    diags
        .entries()
        .iter()
        .map(|d| d.error.kind.clone())
        .collect()
}

// -- assignment and strict evaluation --

#[test]
fn assignment_updates_environment() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize("x <- 2 + 3 * 4\n"), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.variables.get("x"), Some(&14));
}

#[test]
fn division_by_zero_leaves_environment_unchanged() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize("x <- 1\nx <- 5 / 0\n"), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.variables.get("x"), Some(&1));
    assert_eq!(
        interp.diagnostics.entries()[0].error.kind,
        ErrorKind::DivisionByZero
    );
}

#[test]
fn modulo_by_zero_is_division_by_zero() {
    let (_, diags) = run_source("x <- 5 % 0\n");
    assert_eq!(runtime_kinds(&diags), vec![ErrorKind::DivisionByZero]);
}

#[test]
fn undefined_variable_is_strict() {
    let (_, diags) = run_source("y <- x + 1\n");
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::UndefinedVariable { name: "x".into() }]
    );
}

#[test]
fn string_literal_in_arithmetic_is_invalid() {
    let (_, diags) = run_source("x <- \"red\"\n");
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::InvalidLiteral {
            text: "\"red\"".into()
        }]
    );
}

#[test]
fn integer_power() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize("x <- 2 ** 10\ny <- 2 ** 0\n"), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.variables.get("x"), Some(&1024));
    assert_eq!(interp.variables.get("y"), Some(&1));
}

#[test]
fn unknown_operator_raises() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    let expr = Expr::Binary {
        op: "@".into(),
        left: Box::new(Expr::Literal {
            text: "1".into(),
            line: 1,
        }),
        right: Box::new(Expr::Literal {
            text: "2".into(),
            line: 1,
        }),
        line: 1,
    };
    let err = interp.eval(&expr).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownOperator { op: "@".into() });
}

// -- goto, labels, and the lenient condition path --

#[test]
fn counted_loop_terminates_with_expected_value() {
    let source = "i <- 0\nloop\ni <- i + 1\nGoto [loop] (i < 3)\n";
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.variables.get("i"), Some(&3));
    assert!(interp.diagnostics.is_empty());
}

#[test]
fn loop_body_runs_exactly_three_times() {
    // Each iteration advances the cursor by one, so three iterations paint
    // the four pixels (0,0)..(3,0) and park the cursor at (3,0).
    let source = "\
Spawn(0, 0)
i <- 0
loop
DrawLine(1, 0, 2)
i <- i + 1
Goto [loop] (i < 3)
";
    let (canvas, diags) = run_source(source);
    assert!(diags.is_empty(), "{:?}", diags.entries());
    assert_eq!(
        canvas.count_color_pixels(PixelColor::BLACK, 0, 0, 31, 31),
        4
    );
    assert_eq!(canvas.cursor(), (3, 0));
}

#[test]
fn undefined_name_in_condition_defaults_to_zero() {
    // The lenient path: `x` is undefined, the jump never fires, and no
    // diagnostic is produced — while the strict path on the same name
    // raises.
    let source = "Goto [end] (x)\nSpawn(5, 5)\nend\n";
    let (canvas, diags) = run_source(source);
    assert!(diags.is_empty(), "{:?}", diags.entries());
    assert_eq!(canvas.cursor(), (5, 5));
}

#[test]
fn strict_and_lenient_paths_coexist() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let mut interp = Interpreter::new(&mut canvas, &mut diags);

    assert_eq!(interp.eval_condition("x", 1), Ok(0));
    let err = interp
        .eval(&Expr::Variable {
            name: "x".into(),
            line: 1,
        })
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedVariable { name: "x".into() });
}

#[test]
fn condition_comparators() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.variables.insert("i".into(), 2);

    assert_eq!(interp.eval_condition("i==2", 1), Ok(1));
    assert_eq!(interp.eval_condition("i!=2", 1), Ok(0));
    assert_eq!(interp.eval_condition("i>=3", 1), Ok(0));
    assert_eq!(interp.eval_condition("i<=2", 1), Ok(1));
    assert_eq!(interp.eval_condition("i<3", 1), Ok(1));
    assert_eq!(interp.eval_condition("i>1", 1), Ok(1));
}

#[test]
fn condition_without_comparator_uses_truthiness() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.variables.insert("n".into(), 7);

    assert_eq!(interp.eval_condition("n", 1), Ok(1));
    assert_eq!(interp.eval_condition("0", 1), Ok(0));
    assert_eq!(interp.eval_condition("-4", 1), Ok(1));
}

#[test]
fn empty_condition_is_an_empty_expression() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    let err = interp.eval_condition("   ", 4).unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyExpression);
    assert_eq!(err.line, 4);
}

#[test]
fn unresolved_goto_target_reports_and_falls_through() {
    let source = "Goto [nowhere] (1)\nSpawn(3, 3)\n";
    let (canvas, diags) = run_source(source);
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::LabelNotFound {
            name: "nowhere".into()
        }]
    );
    // Execution continued past the failed jump.
    assert_eq!(canvas.cursor(), (3, 3));
}

#[test]
fn repeated_label_keeps_last_occurrence() {
    // Two `mark` labels; the jump lands on the second, so only the last
    // Spawn runs again and the loop exits via the guard.
    let source = "\
done <- 0
mark
Spawn(1, 1)
mark
Spawn(9, 9)
done <- done + 1
Goto [mark] (done < 2)
";
    let mut canvas = Canvas::new(32, 32);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.labels.get("mark"), Some(&3));
    assert_eq!(interp.variables.get("done"), Some(&2));
}

// -- drawing commands --

#[test]
fn spawn_out_of_bounds_reports_and_keeps_cursor() {
    let source = "Spawn(3, 3)\nSpawn(-1, 0)\n";
    let (canvas, diags) = run_source(source);
    assert_eq!(canvas.cursor(), (3, 3));
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::OutOfBounds {
            x: -1,
            y: 0,
            width: 32,
            height: 32
        }]
    );
}

#[test]
fn draw_line_paints_and_moves_cursor() {
    let (canvas, diags) = run_source("Spawn(0, 0)\nDrawLine(1, 0, 5)\n");
    assert!(diags.is_empty());
    for x in 0..5 {
        assert_eq!(canvas.pixel_color(x, 0), Ok(PixelColor::BLACK));
    }
    assert_eq!(canvas.pixel_color(5, 0), Ok(PixelColor::WHITE));
    assert_eq!(canvas.cursor(), (4, 0));
}

#[test]
fn draw_line_rejects_non_unit_direction() {
    let (_, diags) = run_source("DrawLine(2, 0, 3)\n");
    assert!(matches!(
        runtime_kinds(&diags)[0],
        ErrorKind::InvalidCommand {
            command: "DrawLine",
            ..
        }
    ));
}

#[test]
fn color_and_size_change_brush() {
    let source = "Color(\"red\")\nSize(3)\nSpawn(10, 10)\nDrawLine(0, 1, 1)\n";
    let (canvas, diags) = run_source(source);
    assert!(diags.is_empty());
    assert_eq!(canvas.brush_color(), PixelColor::RED);
    assert_eq!(canvas.brush_size(), 3);
    // One size-3 blot.
    assert_eq!(canvas.count_color_pixels(PixelColor::RED, 0, 0, 31, 31), 9);
}

#[test]
fn unknown_color_name_is_invalid_argument() {
    let (_, diags) = run_source("Color(\"vermillion\")\n");
    assert!(matches!(
        &runtime_kinds(&diags)[0],
        ErrorKind::InvalidArgument { what, .. } if what == "Color"
    ));
}

#[test]
fn size_below_one_is_invalid_argument() {
    let (canvas, diags) = run_source("Size(0)\n");
    assert_eq!(canvas.brush_size(), 1);
    assert!(matches!(
        &runtime_kinds(&diags)[0],
        ErrorKind::InvalidArgument { what, .. } if what == "Size"
    ));
}

#[test]
fn fill_repaints_enclosed_region() {
    let source = "\
Spawn(4, 0)
DrawLine(0, 1, 5)
Spawn(0, 4)
DrawLine(1, 0, 5)
Spawn(1, 1)
Color(\"blue\")
Fill()
";
    let (canvas, diags) = run_source(source);
    assert!(diags.is_empty(), "{:?}", diags.entries());
    assert_eq!(canvas.pixel_color(0, 0), Ok(PixelColor::BLUE));
    assert_eq!(canvas.pixel_color(3, 3), Ok(PixelColor::BLUE));
    assert_eq!(canvas.pixel_color(10, 10), Ok(PixelColor::WHITE));
}

#[test]
fn errors_do_not_stop_the_run() {
    let source = "Spawn(-5, 0)\nx <- 1 / 0\nSpawn(2, 2)\n";
    let (canvas, diags) = run_source(source);
    assert_eq!(diags.len(), 2);
    assert_eq!(canvas.cursor(), (2, 2));
}

// -- built-in query functions --

#[test]
fn cursor_and_size_queries() {
    let source = "Spawn(7, 9)\nx <- GetActualX()\ny <- GetActualY()\nn <- GetCanvasSize()\n";
    let mut canvas = Canvas::new(32, 32);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert!(interp.diagnostics.is_empty());
    assert_eq!(interp.variables.get("x"), Some(&7));
    assert_eq!(interp.variables.get("y"), Some(&9));
    assert_eq!(interp.variables.get("n"), Some(&32));
}

#[test]
fn color_count_query() {
    let source = "\
Spawn(0, 0)
DrawLine(1, 0, 4)
n <- GetColorCount(\"black\", 0, 0, 10, 10)
m <- GetColorCount(\"black\", 0, 0, 50, 50)
";
    let mut canvas = Canvas::new(32, 32);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert_eq!(interp.variables.get("n"), Some(&4));
    // Out-of-range corner counts as no matches.
    assert_eq!(interp.variables.get("m"), Some(&0));
}

#[test]
fn brush_predicates() {
    let source = "\
Color(\"red\")
Size(2)
a <- IsBrushColor(\"red\")
b <- IsBrushColor(\"blue\")
c <- IsBrushSize(2)
d <- IsBrushSize(1)
e <- IsCanvasColor(\"white\")
";
    let mut canvas = Canvas::new(32, 32);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize(source), &mut diags);
    let mut interp = Interpreter::new(&mut canvas, &mut diags);
    interp.run(&instructions);
    assert!(interp.diagnostics.is_empty());
    assert_eq!(interp.variables.get("a"), Some(&1));
    assert_eq!(interp.variables.get("b"), Some(&0));
    assert_eq!(interp.variables.get("c"), Some(&1));
    assert_eq!(interp.variables.get("d"), Some(&0));
    assert_eq!(interp.variables.get("e"), Some(&1));
}

#[test]
fn predicate_arity_is_validated() {
    let (_, diags) = run_source("a <- IsBrushSize(1, 2)\n");
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::InvalidFunctionArity {
            name: "IsBrushSize".into(),
            expected: 1,
            got: 2
        }]
    );
}

#[test]
fn getter_arity_is_validated() {
    let (_, diags) = run_source("a <- GetActualX(1)\n");
    assert!(matches!(
        runtime_kinds(&diags)[0],
        ErrorKind::InvalidFunctionArity { expected: 0, .. }
    ));
}

#[test]
fn predicate_argument_shape_is_validated() {
    // An integer where a color name is expected, and vice versa.
    let (_, diags) = run_source("a <- IsBrushColor(3)\nb <- IsBrushSize(\"red\")\n");
    let kinds = runtime_kinds(&diags);
    assert!(matches!(&kinds[0], ErrorKind::InvalidArgument { what, .. } if what == "IsBrushColor"));
    assert!(matches!(&kinds[1], ErrorKind::InvalidArgument { what, .. } if what == "IsBrushSize"));
}

#[test]
fn unknown_function_not_implemented() {
    let (_, diags) = run_source("a <- Whatever(1)\n");
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::FunctionNotImplemented {
            name: "Whatever".into()
        }]
    );
}

#[test]
fn environment_is_fresh_per_execute() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize("x <- 1\n"), &mut diags);
    execute(&instructions, &mut canvas, &mut diags);

    // A second run sees no `x`.
    let instructions = parse(&tokenize("y <- x\n"), &mut diags);
    execute(&instructions, &mut canvas, &mut diags);
    assert_eq!(
        runtime_kinds(&diags),
        vec![ErrorKind::UndefinedVariable { name: "x".into() }]
    );
}

#[test]
fn canvas_persists_across_executes() {
    let mut canvas = Canvas::new(8, 8);
    let mut diags = Diagnostics::new();
    let instructions = parse(&tokenize("Spawn(0, 0)\nDrawLine(1, 0, 2)\n"), &mut diags);
    execute(&instructions, &mut canvas, &mut diags);
    let instructions = parse(&tokenize("DrawLine(0, 1, 2)\n"), &mut diags);
    execute(&instructions, &mut canvas, &mut diags);
    assert!(diags.is_empty());
    // Second run continued from the first run's cursor.
    assert_eq!(canvas.pixel_color(1, 1), Ok(PixelColor::BLACK));
}
