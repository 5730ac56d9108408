pub mod http_test_utils;
pub mod mock_directory;
pub mod test_logging;
