use study_collections::collections::contiguous::GrowableBuffer;

#[derive(Debug, Clone)]
struct MyZST;

impl Drop for MyZST {
    fn drop(&mut self) {
        println!("Dropped MyZST");
    }
}

fn main() {
    println!("\n[GrowableBuffer]\n");

    let mut buf = GrowableBuffer::<u8>::new();
    println!("{:?}", buf);

    for i in 0..12 {
        buf.push_back(i);
        println!("{:?}", buf);
    }

    println!("{:?}, {:?}", buf.pop_back(), buf);

    buf.resize(4);
    println!("{:?}", buf);

    let taken = buf.take();
    println!("{:?}, {:?}", taken, buf);

    println!("\n[ZST Testing]\n");

    let mut buf = GrowableBuffer::<MyZST>::new();
    println!("{:?}", buf);

    for _ in 0..3 {
        buf.push_back(MyZST);
    }

    println!("{:?}", buf);
}
