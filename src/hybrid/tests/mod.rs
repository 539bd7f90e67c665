mod test_hybrid;
