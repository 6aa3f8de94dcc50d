mod tests_indent;
