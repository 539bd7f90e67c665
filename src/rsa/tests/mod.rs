mod test_bigint;
mod test_multipower;
