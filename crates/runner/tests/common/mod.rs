// Common test utilities for integration tests

/// Doubly-recursive reference definition of the Fibonacci sequence.
pub fn fib_recursive(n: i32) -> i32 {
    if n <= 1 {
        n
    } else {
        fib_recursive(n - 1) + fib_recursive(n - 2)
    }
}
