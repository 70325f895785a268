mod pipeline_test;
mod timing_test;
