mod common;

#[cfg(test)]
mod if_stmt {
    use crate::common;

    #[test]
    fn class_in_else() {
        let run = common::run(r#"if (true) 1; else class Foo {}"#);

        assert_eq!(run.stdout, "");
        assert!(run.stderr.contains("Error at 'class': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn class_in_then() {
        let run = common::run(r#"if (true) class Foo {}"#);

        assert_eq!(run.stdout, "");
        assert!(run.stderr.contains("Error at 'class': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn dangling_else() {
        let run = common::run(r#"if (true) if (false) print "bad"; else print "good";"#);

        assert_eq!(run.stdout, "good\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn else_flow() {
        let run = common::run(
            r#"
            if (true) print "good"; else print "bad";
            if (false) print "bad"; else print "good";
            if (false) print "bad"; else { print "block"; }
            "#,
        );

        assert_eq!(run.stdout, "good\ngood\nblock\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn fun_in_else() {
        let run = common::run(r#"if (true) 1; else fun foo() {}"#);

        assert!(run.stderr.contains("Error at 'fun': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn fun_in_then() {
        let run = common::run(r#"if (true) fun foo() {}"#);

        assert!(run.stderr.contains("Error at 'fun': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn if_flow() {
        let run = common::run(
            r#"
            if (true) print "good"; else print "bad";
            if (true) { print "block"; }
            var a = false;
            if (a = true) print a;
            "#,
        );

        assert_eq!(run.stdout, "good\nblock\ntrue\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn truth() {
        let run = common::run(
            r#"
            if (false) print "bad"; else print "false";
            if (nil) print "bad"; else print "null";
            if (true) print "true";
            if (0) print "0";
            if ("") print "empty";
            "#,
        );

        assert_eq!(run.stdout, "false\nnull\ntrue\n0\nempty\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn var_in_else() {
        let run = common::run(r#"if (true) 1; else var foo = 1;"#);

        assert!(run.stderr.contains("Error at 'var': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }

    #[test]
    fn var_in_then() {
        let run = common::run(r#"if (true) var foo = 1;"#);

        assert!(run.stderr.contains("Error at 'var': Expect expression."));
        assert_eq!(run.exit_code, 65);
    }
}
