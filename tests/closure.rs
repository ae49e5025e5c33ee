mod common;

#[cfg(test)]
mod closure {
    use crate::common;

    #[test]
    fn assign_to_closure() {
        let run = common::run(
            r#"
            var f;
            var g;

            {
                var local = "local";
                fun f_() {
                    print local;
                    local = "after f";
                    print local;
                }
                f = f_;

                fun g_() {
                    print local;
                    local = "after g";
                    print local;
                }
                g = g_;
            }

            f();
            g();
            "#,
        );

        assert_eq!(run.stdout, "local\nafter f\nafter f\nafter g\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn assign_to_shadowed_later() {
        let run = common::run(
            r#"
            var a = "global";

            {
                fun assign() {
                    a = "assigned";
                }

                var a = "inner";
                assign();
                print a;
            }

            print a;
            "#,
        );

        assert_eq!(run.stdout, "inner\nassigned\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn close_over_function_parameter() {
        let run = common::run(
            r#"
            var f;

            fun foo(param) {
                fun f_() {
                    print param;
                }
                f = f_;
            }
            foo("param");

            f();
            "#,
        );

        assert_eq!(run.stdout, "param\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn close_over_later_variable() {
        let run = common::run(
            r#"
            var f;
            var g;

            {
                var a = "a";
                var b = "b";
                fun f_() {
                    print b;
                }
                f = f_;

                fun g_() {
                    print a;
                }
                g = g_;
            }

            f();
            g();
            "#,
        );

        assert_eq!(run.stdout, "b\na\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn close_over_method_parameter() {
        let run = common::run(
            r#"
            var f;

            class Foo {
                method(param) {
                    fun f_() {
                        print param;
                    }
                    f = f_;
                }
            }

            Foo().method("param");
            f();
            "#,
        );

        assert_eq!(run.stdout, "param\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn closed_closure_in_function() {
        let run = common::run(
            r#"
            var f;

            {
                var local = "local";
                fun f_() {
                    print local;
                }
                f = f_;
            }

            f();
            "#,
        );

        assert_eq!(run.stdout, "local\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn nested_closure() {
        let run = common::run(
            r#"
            var f;

            fun f1() {
                var a = "a";
                fun f2() {
                    var b = "b";
                    fun f3() {
                        var c = "c";
                        fun f4() {
                            print a;
                            print b;
                            print c;
                        }
                        f = f4;
                    }
                    f3();
                }
                f2();
            }
            f1();

            f();
            "#,
        );

        assert_eq!(run.stdout, "a\nb\nc\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn open_closure_in_function() {
        let run = common::run(
            r#"
            fun f() {
                var local = "local";
                fun g() {
                    print local;
                }
                g();
            }
            f();
            "#,
        );

        assert_eq!(run.stdout, "local\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn reference_closure_multiple_times() {
        let run = common::run(
            r#"
            var f;

            {
                var a = "a";
                fun f_() {
                    print a;
                    print a;
                }
                f = f_;
            }

            f();
            "#,
        );

        assert_eq!(run.stdout, "a\na\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn reuse_closure_slot() {
        let run = common::run(
            r#"
            {
                var f;

                {
                    var a = "a";
                    fun f_() {
                        print a;
                    }
                    f = f_;
                }

                {
                    var b = "b";
                    f();
                }
            }
            "#,
        );

        assert_eq!(run.stdout, "a\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn shadow_closure_with_local() {
        let run = common::run(
            r#"
            {
                var foo = "closure";
                fun f() {
                    {
                        print foo;
                        var foo = "shadow";
                        print foo;
                    }
                    print foo;
                }
                f();
            }
            "#,
        );

        assert_eq!(run.stdout, "closure\nshadow\nclosure\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn unused_closure() {
        let run = common::run(
            r#"
            {
                var a = "a";
                if (false) {
                    fun f() { print a; }
                }
            }

            print "ok";
            "#,
        );

        assert_eq!(run.stdout, "ok\n");
        assert_eq!(run.exit_code, 0);
    }

    #[test]
    fn unused_later_closure() {
        let run = common::run(
            r#"
            var closure;

            {
                var a = "a";

                fun f() {
                    print a;
                }
                closure = f;
            }

            {
                var a = "b";
            }

            closure();
            "#,
        );

        assert_eq!(run.stdout, "a\n");
        assert_eq!(run.exit_code, 0);
    }
}
