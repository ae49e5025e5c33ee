mod common;

#[cfg(test)]
mod operator {
    use crate::common;

    #[test]
    fn add() {
        let run = common::run(
            r#"
            print 123 + 456;
            print "str" + "ing";
            "#,
        );

        assert_eq!(run.stdout, "579\nstring\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn add_bool_nil() {
        let run = common::run(r#"true + nil;"#);

        assert!(run.stderr.starts_with("Operands must be two numbers or two strings."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn add_num_nil() {
        let run = common::run(r#"1 + nil;"#);

        assert!(run.stderr.starts_with("Operands must be two numbers or two strings."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn add_string_num() {
        let run = common::run(r#""str" + 1;"#);

        assert!(run.stderr.starts_with("Operands must be two numbers or two strings."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn comparison() {
        let run = common::run(
            r#"
            print 1 < 2;
            print 2 < 2;
            print 2 < 1;

            print 1 <= 2;
            print 2 <= 2;
            print 2 <= 1;

            print 1 > 2;
            print 2 > 2;
            print 2 > 1;

            print 1 >= 2;
            print 2 >= 2;
            print 2 >= 1;

            print 0 < -0;
            print -0 < 0;
            print 0 > -0;
            print -0 > 0;
            print 0 <= -0;
            print -0 <= 0;
            print 0 >= -0;
            print -0 >= 0;
            "#,
        );

        assert_eq!(
            run.stdout,
            "true\nfalse\nfalse\ntrue\ntrue\nfalse\nfalse\nfalse\ntrue\nfalse\ntrue\ntrue\n\
             false\nfalse\nfalse\nfalse\ntrue\ntrue\ntrue\ntrue\n"
        );
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn divide() {
        let run = common::run(
            r#"
            print 8 / 2;
            print 12.34 / 12.34;
            "#,
        );

        assert_eq!(run.stdout, "4\n1\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn divide_nonnum_num() {
        let run = common::run(r#""1" / 1;"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn divide_num_nonnum() {
        let run = common::run(r#"1 / "1";"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn equals() {
        let run = common::run(
            r#"
            print nil == nil;

            print true == true;
            print true == false;

            print 1 == 1;
            print 1 == 2;

            print "str" == "str";
            print "str" == "ing";
            "#,
        );

        assert_eq!(run.stdout, "true\ntrue\nfalse\ntrue\nfalse\ntrue\nfalse\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn equals_class() {
        let run = common::run(
            r#"
            class Foo {}
            class Bar {}

            print Foo == Foo;
            print Foo == Bar;
            print Foo == "Foo";
            print Foo == Foo();
            "#,
        );

        assert_eq!(run.stdout, "true\nfalse\nfalse\nfalse\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn equals_method() {
        let run = common::run(
            r#"
            class Foo {
                method() {}
            }

            var foo = Foo();
            var foo_method = foo.method;
            print foo_method == foo_method;
            "#,
        );

        assert_eq!(run.stdout, "true\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn greater_nonnum_num() {
        let run = common::run(r#""1" > 1;"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn less_nonnum_num() {
        let run = common::run(r#""1" < 1;"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn multiply() {
        let run = common::run(
            r#"
            print 5 * 3;
            print 12.34 * 0.3;
            "#,
        );

        assert_eq!(run.stdout, "15\n3.702\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn multiply_nonnum_num() {
        let run = common::run(r#""1" * 1;"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn negate() {
        let run = common::run(
            r#"
            print -3;
            print --3;
            print ---3;
            "#,
        );

        assert_eq!(run.stdout, "-3\n3\n-3\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn negate_nonnum() {
        let run = common::run(r#"-"str";"#);

        assert!(run.stderr.starts_with("Operand must be a number."));
        assert_eq!(run.exit_code, 70);
    }

    #[test]
    fn not() {
        let run = common::run(
            r#"
            print !true;
            print !false;
            print !!true;
            print !nil;
            "#,
        );

        assert_eq!(run.stdout, "false\ntrue\ntrue\ntrue\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn not_equals() {
        let run = common::run(
            r#"
            print nil != nil;

            print true != true;
            print true != false;

            print 1 != 1;
            print 1 != 2;

            print "str" != "str";
            print "str" != "ing";
            "#,
        );

        assert_eq!(run.stdout, "false\nfalse\ntrue\nfalse\ntrue\nfalse\ntrue\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn subtract() {
        let run = common::run(
            r#"
            print 4 - 3;
            print 1.2 - 1.2;
            "#,
        );

        assert_eq!(run.stdout, "1\n0\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn subtract_nonnum_num() {
        let run = common::run(r#""1" - 1;"#);

        assert!(run.stderr.starts_with("Operands must be a number."));
        assert_eq!(run.exit_code, 70);
    }
}
