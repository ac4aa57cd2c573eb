/// Join command line words into a single address query
pub fn join_query<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_multi_word_query() {
        assert_eq!(join_query(["Moscow,", "Red", "Square"]), "Moscow, Red Square");
    }

    #[test]
    fn test_join_single_and_empty() {
        assert_eq!(join_query(["Paris"]), "Paris");
        assert_eq!(join_query(Vec::<String>::new()), "");
    }
}
