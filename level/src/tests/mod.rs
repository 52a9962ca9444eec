mod map_data_tests;
