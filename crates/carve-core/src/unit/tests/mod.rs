mod tests_unit;
