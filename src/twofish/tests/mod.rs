mod test_twofish_modes;
