/// Build a [crate::shape::Shape] from literal rows, e.g. `shape![[1, 1], [1, 0]]`
macro_rules! shape {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {{
        let rows: &[&[u8]] = &[ $( &[ $($cell),* ] ),* ];
        crate::shape::Shape::from_rows(rows).expect("Valid test shape")
    }};
}

/// Build a grid mask from literal rows, where 1 is open and 0 is blocked
macro_rules! mask {
    ($([$($cell:expr),* $(,)?]),* $(,)?) => {{
        let rows: Vec<Vec<u8>> = vec![ $( vec![ $($cell),* ] ),* ];
        rows
    }};
}
