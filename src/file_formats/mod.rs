pub mod modelfile;
