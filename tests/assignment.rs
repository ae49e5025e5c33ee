mod common;

#[cfg(test)]
mod assignment {
    use crate::common;

    #[test]
    fn associativity() {
        let run = common::run(
            r#"
            var a = "a";
            var b = "b";
            var c = "c";

            a = b = c;
            print a;
            print b;
            print c;
            "#,
        );

        assert_eq!(run.stdout, "c\nc\nc\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn global() {
        let run = common::run(
            r#"
            var a = "before";
            print a;

            a = "after";
            print a;

            print a = "arg";
            print a;
            "#,
        );

        assert_eq!(run.stdout, "before\nafter\narg\narg\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn local() {
        let run = common::run(
            r#"
            {
                var a = "before";
                print a;

                a = "after";
                print a;

                print a = "arg";
                print a;
            }
            "#,
        );

        assert_eq!(run.stdout, "before\nafter\narg\narg\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn grouping() {
        let run = common::run(r#"var a = "a"; (a) = "value";"#);

        assert_eq!(run.stdout, "");
        assert!(run.stderr.contains("Error at '=': Invalid assignment target."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn infix_operator() {
        let run = common::run(r#"var a = "a"; var b = "b"; a + b = "value";"#);

        assert!(run.stderr.contains("Error at '=': Invalid assignment target."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn prefix_operator() {
        let run = common::run(r#"var a = "a"; !a = "value";"#);

        assert!(run.stderr.contains("Error at '=': Invalid assignment target."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn to_this() {
        let run = common::run(
            r#"
            class Foo {
                Foo() {
                    this = "value";
                }
            }
            "#,
        );

        assert!(run.stderr.contains("Error at '=': Invalid assignment target."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn syntax() {
        let run = common::run(
            r#"
            var a = "a";
            var b = (a = "value");
            print a;
            print b;
            "#,
        );

        assert_eq!(run.stdout, "value\nvalue\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn undefined() {
        let run = common::run(r#"unknown = "what";"#);

        assert_eq!(run.stdout, "");
        assert!(run.stderr.starts_with("Undefined variable 'unknown'."));
        assert_eq!(run.exit_code, 70);
    }
}
